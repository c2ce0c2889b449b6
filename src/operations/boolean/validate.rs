use crate::error::{BooleanError, Result};
use crate::operations::query::shell_count;
use crate::topology::Mesh;

/// Checks that a boolean result is one closed, consistently oriented shell.
///
/// # Errors
///
/// Returns [`BooleanError::EmptyResult`], [`BooleanError::NonManifoldResult`]
/// or [`BooleanError::MultipleShells`].
pub(super) fn validate_result(mesh: &Mesh) -> Result<()> {
    if mesh.is_empty() {
        return Err(BooleanError::EmptyResult.into());
    }
    let counts = mesh.directed_edge_counts();
    let mut bad: Vec<(u32, u32, usize, usize)> = counts
        .iter()
        .filter_map(|(&(a, b), &n)| {
            let back = counts.get(&(b, a)).copied().unwrap_or(0);
            (n != 1 || back != 1).then_some((a, b, n, back))
        })
        .collect();
    if !bad.is_empty() {
        bad.sort_unstable();
        let (a, b, n, back) = bad[0];
        return Err(BooleanError::NonManifoldResult(format!(
            "{} bad edges, first ({a}, {b}) used {n} times forward and {back} back",
            bad.len()
        ))
        .into());
    }
    let shells = shell_count(mesh);
    if shells != 1 {
        return Err(BooleanError::MultipleShells(shells).into());
    }
    Ok(())
}
