/// Divides `sum` by `count`. Returns 0.0 for an empty group.
pub fn ratio(sum: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}
