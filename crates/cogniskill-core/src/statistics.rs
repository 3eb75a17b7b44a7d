//! Descriptive statistics and Pearson correlation over the record table.

use serde::{Deserialize, Serialize};

use crate::model::{StudentRecord, NUMERIC_COLUMNS};

/// Summary of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` for fewer than two values.
    pub std: Option<f64>,
    pub min: f64,
    #[serde(rename = "25%")]
    pub q25: f64,
    #[serde(rename = "50%")]
    pub median: f64,
    #[serde(rename = "75%")]
    pub q75: f64,
    pub max: f64,
}

/// Pairwise Pearson correlations between named columns.
///
/// `values[i][j]` is `None` when either column has zero variance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Coefficient between two columns by name.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }

    /// Correlations of every other column with `target`, strongest first.
    ///
    /// Undefined coefficients sort last.
    pub fn ranked_against(&self, target: &str) -> Vec<(String, Option<f64>)> {
        let Some(t) = self.columns.iter().position(|c| c == target) else {
            return Vec::new();
        };
        let mut ranked: Vec<(String, Option<f64>)> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != t)
            .map(|(i, c)| (c.clone(), self.values[t][i]))
            .collect();
        ranked.sort_by(|a, b| match (a.1, b.1) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        ranked
    }
}

/// Extract a numeric column from the records.
pub fn column(records: &[StudentRecord], name: &str) -> Vec<f64> {
    records.iter().filter_map(|r| r.numeric(name)).collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// True when every value equals the first.
///
/// Checked directly: the mean of a constant like 45.3 is not exact, so a
/// zero test on the summed deviations misses it.
pub fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}

/// Sample standard deviation (n − 1 denominator).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    if is_constant(values) {
        return Some(0.0);
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

/// Quantile with linear interpolation between closest ranks.
///
/// `sorted` must be ascending and non-empty.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Summarise a single column. Returns `None` for an empty column.
pub fn summarize(name: &str, values: &[f64]) -> Option<ColumnSummary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(ColumnSummary {
        column: name.to_string(),
        count: values.len(),
        mean: mean(values),
        std: std_dev(values),
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Descriptive statistics for every numeric column.
pub fn describe(records: &[StudentRecord]) -> Vec<ColumnSummary> {
    NUMERIC_COLUMNS
        .iter()
        .filter_map(|name| summarize(name, &column(records, name)))
        .collect()
}

/// Pearson correlation; `None` if either series is constant or too short.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 || is_constant(x) || is_constant(y) {
        return None;
    }
    let (mx, my) = (mean(x), mean(y));
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let (dx, dy) = (a - mx, b - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Correlation matrix over the given columns.
///
/// The result is symmetric by construction and has exactly 1.0 on the
/// diagonal of every non-constant column.
pub fn correlation_matrix(records: &[StudentRecord], columns: &[&str]) -> CorrelationMatrix {
    let data: Vec<Vec<f64>> = columns.iter().map(|c| column(records, c)).collect();
    let n = columns.len();
    let mut values = vec![vec![None; n]; n];

    for i in 0..n {
        values[i][i] = pearson(&data[i], &data[i]).map(|_| 1.0);
        for j in (i + 1)..n {
            let r = pearson(&data[i], &data[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    let undefined: Vec<&str> = columns
        .iter()
        .enumerate()
        .filter(|(i, _)| values[*i][*i].is_none())
        .map(|(_, c)| *c)
        .collect();
    if !undefined.is_empty() {
        tracing::warn!(?undefined, "zero-variance columns have undefined correlation");
    }

    CorrelationMatrix {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::record;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn quartiles_interpolate() {
        let s = summarize("x", &[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(s.count, 4);
        assert!(approx(s.mean, 2.5));
        assert!(approx(s.min, 1.0));
        assert!(approx(s.q25, 1.75));
        assert!(approx(s.median, 2.5));
        assert!(approx(s.q75, 3.25));
        assert!(approx(s.max, 4.0));
        assert!(approx(s.std.unwrap(), (5.0f64 / 3.0).sqrt()));
    }

    #[test]
    fn single_value_has_no_std() {
        let s = summarize("x", &[7.0]).unwrap();
        assert_eq!(s.std, None);
        assert!(approx(s.median, 7.0));
        assert!(summarize("x", &[]).is_none());
    }

    #[test]
    fn pearson_perfect_and_inverse() {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert!(approx(pearson(&x, &[2.0, 4.0, 6.0, 8.0]).unwrap(), 1.0));
        assert!(approx(pearson(&x, &[8.0, 6.0, 4.0, 2.0]).unwrap(), -1.0));
    }

    #[test]
    fn constant_column_is_undefined_not_an_error() {
        let x = [1.0, 2.0, 3.0];
        assert_eq!(pearson(&x, &[5.0, 5.0, 5.0]), None);
    }

    #[test]
    fn inexact_constants_are_undefined() {
        let x: Vec<f64> = (0..10).map(f64::from).collect();
        let tenth = [0.1; 10];
        assert_eq!(pearson(&x, &tenth), None);
        assert_eq!(pearson(&tenth, &tenth), None);
        assert_eq!(std_dev(&[45.3; 7]), Some(0.0));

        let records: Vec<StudentRecord> = (1..=7)
            .map(|i| {
                let mut r = record(i, [50.0 + i as f64, 60.0, 70.0, 80.0], 70.0);
                r.engagement_time = 45.3;
                r
            })
            .collect();
        let m = correlation_matrix(&records, &["comprehension", "engagement_time"]);
        assert_eq!(m.get("engagement_time", "engagement_time"), None);
        assert_eq!(m.get("comprehension", "engagement_time"), None);
        assert_eq!(m.get("comprehension", "comprehension"), Some(1.0));

        let summary = summarize("engagement_time", &column(&records, "engagement_time")).unwrap();
        assert_eq!(summary.std, Some(0.0));
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let records = vec![
            record(1, [80.0, 60.0, 70.0, 90.0], 75.0),
            record(2, [60.0, 65.0, 50.0, 70.0], 60.0),
            record(3, [90.0, 85.0, 80.0, 95.0], 88.0),
            record(4, [50.0, 40.0, 45.0, 55.0], 48.0),
        ];
        let cols = ["comprehension", "attention", "focus", "retention", "assessment_score"];
        let m = correlation_matrix(&records, &cols);
        for i in 0..cols.len() {
            assert_eq!(m.values[i][i], Some(1.0));
            for j in 0..cols.len() {
                assert_eq!(m.values[i][j], m.values[j][i]);
            }
        }
    }

    #[test]
    fn matrix_marks_constant_columns() {
        // The fixture gives every record the same engagement time.
        let records = vec![
            record(1, [80.0, 60.0, 70.0, 90.0], 75.0),
            record(2, [60.0, 65.0, 50.0, 70.0], 60.0),
            record(3, [90.0, 85.0, 80.0, 95.0], 88.0),
        ];
        let m = correlation_matrix(&records, &["comprehension", "engagement_time"]);
        assert_eq!(m.get("engagement_time", "engagement_time"), None);
        assert_eq!(m.get("comprehension", "engagement_time"), None);
        assert_eq!(m.get("comprehension", "comprehension"), Some(1.0));
    }

    #[test]
    fn ranked_against_puts_undefined_last() {
        let m = CorrelationMatrix {
            columns: vec!["a".into(), "b".into(), "c".into(), "t".into()],
            values: vec![
                vec![Some(1.0), None, None, Some(0.2)],
                vec![None, None, None, None],
                vec![None, None, Some(1.0), Some(0.9)],
                vec![Some(0.2), None, Some(0.9), Some(1.0)],
            ],
        };
        let ranked = m.ranked_against("t");
        let names: Vec<&str> = ranked.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert!(m.ranked_against("missing").is_empty());
    }

    #[test]
    fn describe_covers_numeric_columns() {
        let records = vec![
            record(1, [80.0, 60.0, 70.0, 90.0], 75.0),
            record(2, [60.0, 65.0, 50.0, 70.0], 60.0),
        ];
        let stats = describe(&records);
        assert_eq!(stats.len(), NUMERIC_COLUMNS.len());
        let comp = stats.iter().find(|s| s.column == "comprehension").unwrap();
        assert!(approx(comp.mean, 70.0));
    }
}
