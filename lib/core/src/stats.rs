//! Statistics helpers
//!
//! Member counting, Shannon entropy and Pearson correlation. Degenerate
//! inputs (empty columns, zero variance) resolve to `0.0` so no NaN ever
//! leaves this module.

use crate::value::Value;
use ahash::AHashMap;

/// Count occurrences of each distinct value, in first-appearance order
pub fn member_count<'a, I>(values: I) -> Vec<(Value, usize)>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut index: AHashMap<&'a Value, usize> = AHashMap::new();
    let mut members: Vec<(Value, usize)> = Vec::new();
    for value in values {
        match index.get(value) {
            Some(&slot) => members[slot].1 += 1,
            None => {
                index.insert(value, members.len());
                members.push((value.clone(), 1));
            }
        }
    }
    members
}

/// Shannon entropy (bits) of a frequency distribution
pub fn entropy(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.log2()
        })
        .sum()
}

/// Shannon entropy (bits) of a weight distribution
///
/// Weights are taken by magnitude, so a measure column with mixed signs
/// still yields a proper distribution of shares.
pub fn weighted_entropy(weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().filter(|w| w.is_finite()).map(|w| w.abs()).sum();
    if total <= 0.0 {
        return 0.0;
    }
    weights
        .iter()
        .filter(|w| w.is_finite() && **w != 0.0)
        .map(|w| {
            let p = w.abs() / total;
            -p * p.log2()
        })
        .sum()
}

/// Largest possible entropy for `n` outcomes
pub fn max_entropy(n: usize) -> f64 {
    if n <= 1 {
        0.0
    } else {
        (n as f64).log2()
    }
}

/// Pearson correlation coefficient
///
/// Returns `0.0` when fewer than two observations are available or when
/// either side has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let len = x.len().min(y.len());
    if len < 2 {
        return 0.0;
    }
    let n = len as f64;
    let mean_x = x[..len].iter().sum::<f64>() / n;
    let mean_y = y[..len].iter().sum::<f64>() / n;

    let mut num = 0.0;
    let mut den_x = 0.0;
    let mut den_y = 0.0;
    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        num += dx * dy;
        den_x += dx * dx;
        den_y += dy * dy;
    }

    let den = (den_x * den_y).sqrt();
    if den == 0.0 {
        return 0.0;
    }
    let r = num / den;
    if r.is_finite() {
        r.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Pairwise Pearson correlation matrix over columns with missing cells
///
/// Each pair uses only the rows where both columns are present. The result
/// is symmetric with a unit diagonal.
pub fn correlation_matrix(columns: &[Vec<Option<f64>>]) -> Vec<Vec<f64>> {
    let k = columns.len();
    let mut matrix = vec![vec![0.0; k]; k];
    for i in 0..k {
        matrix[i][i] = 1.0;
        for j in (i + 1)..k {
            let (xs, ys): (Vec<f64>, Vec<f64>) = columns[i]
                .iter()
                .zip(columns[j].iter())
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .unzip();
            let r = pearson(&xs, &ys);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_count_order() {
        let values = vec![Value::text("b"), Value::text("a"), Value::text("b"), Value::Null];
        let counts = member_count(&values);
        assert_eq!(
            counts,
            vec![(Value::text("b"), 2), (Value::text("a"), 1), (Value::Null, 1)]
        );
    }

    #[test]
    fn test_entropy() {
        assert_eq!(entropy(&[]), 0.0);
        assert_eq!(entropy(&[7]), 0.0);
        assert!((entropy(&[1, 1]) - 1.0).abs() < 1e-12);
        assert!((entropy(&[1, 1, 1, 1]) - 2.0).abs() < 1e-12);
        assert!((max_entropy(4) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_entropy_matches_counts() {
        let a = weighted_entropy(&[3.0, 1.0]);
        let b = entropy(&[3, 1]);
        assert!((a - b).abs() < 1e-12);
        assert_eq!(weighted_entropy(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_pearson() {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert!((pearson(&x, &[2.0, 4.0, 6.0, 8.0]) - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &[8.0, 6.0, 4.0, 2.0]) + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&x, &[5.0, 5.0, 5.0, 5.0]), 0.0);
        assert_eq!(pearson(&[1.0], &[2.0]), 0.0);
    }

    #[test]
    fn test_correlation_matrix_constant_column() {
        let columns = vec![
            vec![Some(1.0), Some(2.0), Some(3.0)],
            vec![Some(4.0), Some(4.0), Some(4.0)],
            vec![Some(3.0), None, Some(1.0)],
        ];
        let matrix = correlation_matrix(&columns);
        assert_eq!(matrix[0][0], 1.0);
        assert_eq!(matrix[1][1], 1.0);
        assert_eq!(matrix[0][1], 0.0);
        assert_eq!(matrix[1][0], 0.0);
        assert!((matrix[0][2] + 1.0).abs() < 1e-12);
        assert_eq!(matrix[0][2], matrix[2][0]);
        assert!(matrix.iter().flatten().all(|v| v.is_finite()));
    }
}
