//! Constant-velocity Kalman filter over a box center, used to place the
//! template search window between frames.

use nalgebra::{Matrix2, Matrix2x4, Matrix4, Vector2, Vector4};

/// Filter state: mean `[cx, cy, vx, vy]` and its covariance.
#[derive(Debug, Clone)]
pub struct MotionState {
    pub mean: Vector4<f64>,
    pub covariance: Matrix4<f64>,
}

impl MotionState {
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (self.mean[0], self.mean[1])
    }

    #[inline]
    pub fn velocity(&self) -> (f64, f64) {
        (self.mean[2], self.mean[3])
    }
}

#[derive(Debug, Clone)]
pub struct KalmanFilter {
    motion_mat: Matrix4<f64>,
    update_mat: Matrix2x4<f64>,
    std_weight_position: f64,
    std_weight_velocity: f64,
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl KalmanFilter {
    pub fn new() -> Self {
        let mut motion_mat = Matrix4::identity();
        motion_mat[(0, 2)] = 1.0;
        motion_mat[(1, 3)] = 1.0;

        let update_mat = Matrix2x4::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0);

        Self {
            motion_mat,
            update_mat,
            std_weight_position: 1.0 / 20.0,
            std_weight_velocity: 1.0 / 160.0,
        }
    }

    /// Start a track at `center` with zero velocity. `scale` is the box
    /// height, which sets the noise levels.
    pub fn initiate(&self, center: (f64, f64), scale: f64) -> MotionState {
        let mean = Vector4::new(center.0, center.1, 0.0, 0.0);

        let p = 2.0 * self.std_weight_position * scale;
        let v = 10.0 * self.std_weight_velocity * scale;
        let covariance = Matrix4::from_diagonal(&Vector4::new(p * p, p * p, v * v, v * v));

        MotionState { mean, covariance }
    }

    pub fn predict(&self, state: &MotionState, scale: f64) -> MotionState {
        let p = self.std_weight_position * scale;
        let v = self.std_weight_velocity * scale;
        let motion_cov = Matrix4::from_diagonal(&Vector4::new(p * p, p * p, v * v, v * v));

        MotionState {
            mean: self.motion_mat * state.mean,
            covariance: self.motion_mat * state.covariance * self.motion_mat.transpose()
                + motion_cov,
        }
    }

    /// Correct the state with a measured center. Returns `None` if the
    /// innovation covariance is singular.
    pub fn update(
        &self,
        state: &MotionState,
        measurement: (f64, f64),
        scale: f64,
    ) -> Option<MotionState> {
        let p = self.std_weight_position * scale;
        let innovation_cov = Matrix2::from_diagonal(&Vector2::new(p * p, p * p));

        let projected_mean = self.update_mat * state.mean;
        let projected_cov =
            self.update_mat * state.covariance * self.update_mat.transpose() + innovation_cov;

        let s_inv = projected_cov.try_inverse()?;
        let kalman_gain = state.covariance * self.update_mat.transpose() * s_inv;

        let innovation = Vector2::new(measurement.0, measurement.1) - projected_mean;

        Some(MotionState {
            mean: state.mean + kalman_gain * innovation,
            covariance: state.covariance - kalman_gain * projected_cov * kalman_gain.transpose(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initiate() {
        let kf = KalmanFilter::new();
        let state = kf.initiate((100.0, 200.0), 50.0);
        assert_eq!(state.center(), (100.0, 200.0));
        assert_eq!(state.velocity(), (0.0, 0.0));
    }

    #[test]
    fn test_learns_constant_velocity() {
        let kf = KalmanFilter::new();
        let mut state = kf.initiate((0.0, 0.0), 20.0);
        for step in 1..=30 {
            state = kf.predict(&state, 20.0);
            state = kf.update(&state, (step as f64 * 4.0, step as f64 * -2.0), 20.0).unwrap();
        }

        let (vx, vy) = state.velocity();
        assert!((vx - 4.0).abs() < 0.5, "vx = {vx}");
        assert!((vy + 2.0).abs() < 0.5, "vy = {vy}");

        let predicted = kf.predict(&state, 20.0);
        assert!((predicted.center().0 - 124.0).abs() < 2.0);
    }
}
