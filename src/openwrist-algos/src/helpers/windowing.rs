#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidWindowError {
    pub window: usize,
    pub len: usize,
}

/// Mean of every `window`-long slice of `a`, advancing `stride` samples
/// between windows. Fails when the window is empty, longer than `a`, or the
/// stride is zero.
pub fn moving_mean(
    a: &[f64],
    window: usize,
    stride: usize,
) -> Result<Vec<f64>, InvalidWindowError> {
    if window == 0 || stride == 0 || window > a.len() {
        return Err(InvalidWindowError {
            window,
            len: a.len(),
        });
    }

    let n = window as f64;
    Ok(a.windows(window)
        .step_by(stride)
        .map(|w| w.iter().sum::<f64>() / n)
        .collect())
}

/// Sum of every `window`-long slice of an integer sequence, stride 1.
/// Integer sums stay exact, so comparing `sum / window` against a fraction
/// matches a floating moving mean of the same data.
pub fn window_sums(a: &[i64], window: usize) -> Result<Vec<i64>, InvalidWindowError> {
    if window == 0 || window > a.len() {
        return Err(InvalidWindowError {
            window,
            len: a.len(),
        });
    }

    let mut sums = Vec::with_capacity(a.len() - window + 1);
    let mut acc: i64 = a[..window].iter().sum();
    sums.push(acc);
    for i in window..a.len() {
        acc += a[i] - a[i - window];
        sums.push(acc);
    }
    Ok(sums)
}

/// Inclusive prefix counts: `out[k]` is the sum of `a[..k]`.
pub fn prefix_sums(a: &[u8]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len() + 1);
    out.push(0);
    let mut acc = 0;
    for &v in a {
        acc += usize::from(v);
        out.push(acc);
    }
    out
}

/// Maximal runs of equal values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunLengths<T> {
    pub lengths: Vec<usize>,
    pub starts: Vec<usize>,
    pub values: Vec<T>,
}

impl<T: PartialEq + Copy> RunLengths<T> {
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Lengths of the runs holding `value`.
    pub fn lengths_of(&self, value: T) -> Vec<usize> {
        self.lengths
            .iter()
            .zip(&self.values)
            .filter(|(_, v)| **v == value)
            .map(|(l, _)| *l)
            .collect()
    }
}

pub fn run_length_encode<T: PartialEq + Copy>(a: &[T]) -> RunLengths<T> {
    let mut rle = RunLengths {
        lengths: Vec::new(),
        starts: Vec::new(),
        values: Vec::new(),
    };

    let mut iter = a.iter().enumerate();
    let Some((_, &first)) = iter.next() else {
        return rle;
    };

    let mut current = first;
    let mut start = 0;
    for (i, &value) in iter {
        if value != current {
            rle.lengths.push(i - start);
            rle.starts.push(start);
            rle.values.push(current);
            current = value;
            start = i;
        }
    }
    rle.lengths.push(a.len() - start);
    rle.starts.push(start);
    rle.values.push(current);

    rle
}
