#![allow(non_snake_case)]

// Elimination tree construction for a symmetric matrix in compressed
// sparse column form, upper triangle stored.

/// marks a node whose parent is not yet known, or a tree root
pub(crate) const NO_PARENT: usize = usize::MAX;

/// Build the elimination tree and per-column factor counts in one pass.
///
/// On return `parent[v]` holds the elimination tree parent of `v`
/// (`NO_PARENT` for roots) and `Lnz[v]` the number of strictly subdiagonal
/// nonzeros in column `v` of the factor.   `work` is scratch of length at
/// least `n` and carries the per-column visit tags; tagging with the current
/// column index instead of clearing keeps the pass near linear in the size
/// of the output.
///
/// Entries within each column may appear in any order.   Row indices must
/// not exceed their column index (upper triangular input); the caller is
/// responsible for checking this.
pub(crate) fn elimination_tree(
    n: usize,
    Ap: &[usize],
    Ai: &[usize],
    work: &mut [usize],
    Lnz: &mut [usize],
    parent: &mut [usize],
) {
    // zero out Lnz and work.  Set all parent values to unknown
    work[..n].fill(0);
    Lnz.fill(0);
    parent.fill(NO_PARENT);

    for j in 0..n {
        // mark j as visited by itself so the walks below terminate
        work[j] = j;
        for istart in Ai.iter().take(Ap[j + 1]).skip(Ap[j]) {
            let mut i = *istart;

            // follow the partially built tree upward from i, stopping at
            // the first node already tagged by column j
            while work[i] != j {
                if parent[i] == NO_PARENT {
                    parent[i] = j;
                }
                Lnz[i] += 1; // L(j,i) is structurally nonzero
                work[i] = j;
                i = parent[i];
            }
        }
    }
}
