pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        f64::NAN
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation of the fitted points.
    pub r: f64,
}

impl LinearFit {
    pub fn r_squared(&self) -> f64 {
        self.r * self.r
    }
}

/// Ordinary least squares of `y` on `x`. `None` with fewer than two points
/// or when `x` has no spread.
pub fn linear_regression(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let x_mean = mean(x);
    let y_mean = mean(y);

    let (mut ssx, mut ssy, mut ssxy) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        ssx += dx * dx;
        ssy += dy * dy;
        ssxy += dx * dy;
    }

    if ssx == 0.0 {
        return None;
    }

    let slope = ssxy / ssx;
    let r_den = (ssx * ssy).sqrt();
    let r = if r_den == 0.0 {
        0.0
    } else {
        (ssxy / r_den).clamp(-1.0, 1.0)
    };

    Some(LinearFit {
        slope,
        intercept: y_mean - slope * x_mean,
        r,
    })
}
