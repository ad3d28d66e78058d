use super::*;
use crate::algebra::CscMatrix;

fn test_matrix_4x4() -> CscMatrix<f64> {
    // A =
    //[ 8.0  -3.0   2.0    ⋅ ]
    //[  ⋅    8.0  -1.0    ⋅ ]
    //[  ⋅     ⋅    8.0  -1.0]
    //[  ⋅     ⋅     ⋅    1.0]
    let Ap = vec![0, 1, 3, 6, 8];
    let Ai = vec![0, 0, 1, 0, 1, 2, 2, 3];
    let Ax = vec![8., -3., 8., 2., -1., 8., -1., 1.];
    CscMatrix {
        m: 4,
        n: 4,
        colptr: Ap,
        rowval: Ai,
        nzval: Ax,
    }
}

// upper triangle of the adjacency-plus-diagonal pattern of a 4 node path
// graph 0 - 1 - 2 - 3
fn path_graph_4() -> CscMatrix<f64> {
    CscMatrix {
        m: 4,
        n: 4,
        colptr: vec![0, 1, 3, 5, 7],
        rowval: vec![0, 0, 1, 1, 2, 2, 3],
        nzval: vec![2., -1., 2., -1., 2., -1., 2.],
    }
}

// tests some of the private functions of the symbolic module.  Configured
// as a submodule to expose internals.

#[test]
fn test_invperm() {
    let perm = vec![3, 0, 2, 1];
    assert!(invperm(&perm).is_ok())
}

//test fail on bad permutation
#[test]
fn test_invperm_bad_perm1() {
    let perm = vec![3, 0, 2, 0]; //repeated index
    assert!(invperm(&perm).is_err())
}

#[test]
fn test_invperm_bad_perm2() {
    let perm = vec![4, 0, 2, 1]; //index too big
    assert!(invperm(&perm).is_err())
}

#[test]
fn test_invperm_bad_perm3() {
    let perm = vec![3, 3, 2, 1]; //repeated index written over slot 0
    assert!(invperm(&perm).is_err())
}

#[test]
fn test_permute() {
    let perm = vec![3, 0, 2, 1];
    let b = vec![1., 2., 3., 4.];
    let mut x = vec![0.; 4];
    let mut y = vec![0.; 4];

    permute(&mut x, &b, &perm);
    assert_eq!(x, vec![4., 1., 3., 2.]);

    ipermute(&mut y, &x, &perm);
    assert_eq!(y, b);
}

#[test]
fn test_permute_symmetric() {
    //no permutation at all
    let A = test_matrix_4x4();
    let iperm: Vec<usize> = vec![0, 1, 2, 3];
    let (P, AtoPAPt) = permute_symmetric(&A, &iperm);

    assert_eq!(&A.colptr, &P.colptr);
    assert_eq!(&A.rowval, &P.rowval);
    assert_eq!(&A.nzval, &P.nzval);
    let linearidx: Vec<usize> = (0..AtoPAPt.len()).collect();
    assert_eq!(&linearidx, &AtoPAPt);

    //test with a permutation.  NB: the permutation produces a result in
    //which entries are not ordered by increasing row number within each
    //column, so caution is required when comparing w.r.t. other tools
    //(i.e. Matlab/Julia/Python etc)

    let mut A = test_matrix_4x4();

    //set the problem data to increasing values columnwise
    for i in 0..A.nzval.len() {
        A.nzval[i] = i as f64 + 1.;
    }

    let perm: Vec<usize> = vec![2, 3, 0, 1];
    let iperm = invperm(&perm).unwrap();
    let (P, _) = permute_symmetric(&A, &iperm);

    assert_eq!(&P.colptr, &vec![0, 1, 3, 5, 8]);
    assert_eq!(&P.rowval, &vec![0, 0, 1, 2, 0, 2, 3, 0]);
    assert_eq!(&P.nzval, &vec![6.0, 7.0, 8.0, 1.0, 4.0, 2.0, 3.0, 5.0]);
}

#[test]
fn test_elimination_tree() {
    let A = test_matrix_4x4();
    let symb = SymbolicFactorization::new(&A).unwrap();

    assert_eq!(symb.parent(0), Some(1));
    assert_eq!(symb.parent(1), Some(2));
    assert_eq!(symb.parent(2), Some(3));
    assert_eq!(symb.parent(3), None);
    assert_eq!(symb.nonzeros_per_col(), &[2, 1, 1, 0]);
    assert_eq!(symb.lower_nnz(), 8);
    assert_eq!(symb.fillin_nnz(), 12);
}

#[test]
fn test_count_fillin_4x4() {
    let A = test_matrix_4x4();
    assert_eq!(count_fillin(&A).unwrap(), 12);
}

#[test]
fn test_count_fillin_diagonal() {
    let A: CscMatrix<f64> = CscMatrix::identity(5);
    assert_eq!(count_fillin(&A).unwrap(), 5);
}

#[test]
fn test_count_fillin_empty() {
    let A: CscMatrix<f64> = CscMatrix::spalloc((0, 0), 0);
    assert_eq!(count_fillin(&A).unwrap(), 0);
}

#[test]
fn test_count_fillin_path_graph() {
    // a path graph eliminated end to end produces no fill at all,
    // so the count is just the input nonzeros
    let A = path_graph_4();
    assert_eq!(count_fillin(&A).unwrap(), 10);
}

#[test]
fn test_count_fillin_rejects_bad_patterns() {
    //not square
    let A: CscMatrix<f64> = CscMatrix::spalloc((2, 3), 0);
    assert!(matches!(count_fillin(&A), Err(FillinError::NotSquare)));

    //not upper triangular
    let A = CscMatrix::from(&[
        [1.0, 2.0, 0.0], //
        [2.0, 3.0, 4.0],
        [0.0, 4.0, 5.0],
    ]);
    assert!(matches!(
        count_fillin(&A),
        Err(FillinError::NotUpperTriangular)
    ));

    //...but its upper triangle is fine
    assert!(count_fillin(&A.to_triu()).is_ok());
}

#[test]
fn test_count_with_permutation_validates() {
    let A = path_graph_4();

    //wrong length
    let res = count_fillin_with_permutation(&A, &[0, 1, 2]);
    assert!(matches!(res, Err(FillinError::PermutationLengthMismatch)));

    //not a bijection
    let res = count_fillin_with_permutation(&A, &[0, 1, 2, 2]);
    assert!(matches!(res, Err(FillinError::InvalidPermutation(_))));
}

#[test]
fn test_permutation_sensitivity() {
    let A = path_graph_4();

    //natural order: no fill
    let natural = count_fillin_with_permutation(&A, &[0, 1, 2, 3]).unwrap();
    assert_eq!(natural, 10);

    //eliminating the interior vertices first creates fill
    let interior_first = count_fillin_with_permutation(&A, &[1, 3, 0, 2]).unwrap();
    assert_eq!(interior_first, 12);
    assert!(interior_first > natural);
}
