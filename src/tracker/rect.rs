/// Real-valued bounding box in pixel coordinates, as consumed and produced by
/// the tracker.
///
/// Supports two common bounding box formats:
/// - TLWH: Top-Left X, Top-Left Y, Width, Height
/// - TLBR: Top-Left X, Top-Left Y, Bottom-Right X, Bottom-Right Y
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f64,
    /// Top-left y coordinate
    pub y: f64,
    /// Width of the bounding box
    pub width: f64,
    /// Height of the bounding box
    pub height: f64,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Scale a normalized center/size box (fractions of the frame) to pixels.
    #[inline]
    pub fn from_normalized_xywh(
        cx: f64,
        cy: f64,
        w: f64,
        h: f64,
        frame_width: u32,
        frame_height: u32,
    ) -> Self {
        let (fw, fh) = (frame_width as f64, frame_height as f64);
        let width = w * fw;
        let height = h * fh;
        Self {
            x: cx * fw - width / 2.0,
            y: cy * fh - height / 2.0,
            width,
            height,
        }
    }

    /// Inverse of [`Rect::from_normalized_xywh`].
    #[inline]
    pub fn to_normalized_xywh(&self, frame_width: u32, frame_height: u32) -> [f64; 4] {
        let (fw, fh) = (frame_width as f64, frame_height as f64);
        let (cx, cy) = self.center();
        [cx / fw, cy / fh, self.width / fw, self.height / fh]
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f64; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Convert to TLWH format: (x, y, width, height).
    #[inline]
    pub fn to_tlwh(&self) -> [f64; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Get the center point of the bounding box.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Get the area of the bounding box.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether the box lies entirely inside a `frame_width x frame_height` image.
    #[inline]
    pub fn is_inside(&self, frame_width: u32, frame_height: u32) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.width > 0.0
            && self.height > 0.0
            && self.x + self.width <= frame_width as f64
            && self.y + self.height <= frame_height as f64
    }

    /// Calculate Intersection over Union (IoU) with another bounding box.
    pub fn iou(&self, other: &Rect) -> f64 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        let inter_width = (x2 - x1).max(0.0);
        let inter_height = (y2 - y1).max(0.0);
        let inter_area = inter_width * inter_height;

        let union_area = self.area() + other.area() - inter_area;

        if union_area > 0.0 {
            inter_area / union_area
        } else {
            0.0
        }
    }
}

/// Integer bounding box in whole pixels, as produced by the detector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PixelBox {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelBox {
    #[inline]
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Scale a normalized center/size box to whole pixels.
    ///
    /// Center and size are truncated to integers first, then the half size
    /// is subtracted with integer division, so the result matches the pixel
    /// grid the network outputs were decoded on.
    pub fn from_normalized_xywh(
        cx: f32,
        cy: f32,
        w: f32,
        h: f32,
        frame_width: u32,
        frame_height: u32,
    ) -> Self {
        let center_x = (cx * frame_width as f32) as i32;
        let center_y = (cy * frame_height as f32) as i32;
        let width = (w * frame_width as f32) as i32;
        let height = (h * frame_height as f32) as i32;

        Self {
            left: center_x.saturating_sub(width / 2),
            top: center_y.saturating_sub(height / 2),
            width,
            height,
        }
    }

    /// Lossless widening into the tracker's coordinate space.
    #[inline]
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            f64::from(self.left),
            f64::from(self.top),
            f64::from(self.width),
            f64::from(self.height),
        )
    }

    #[inline]
    pub fn iou(&self, other: &PixelBox) -> f64 {
        self.to_rect().iou(&other.to_rect())
    }
}

impl From<PixelBox> for Rect {
    #[inline]
    fn from(b: PixelBox) -> Self {
        b.to_rect()
    }
}
