use cramer::{CramerOutcome, Expr, Matrix, ShapeError, SolutionValue, solve};
use proptest::prelude::*;

fn square_system() -> impl Strategy<Value = (Vec<Vec<i64>>, Vec<i64>)> {
    (1usize..=4).prop_flat_map(|n| {
        (
            prop::collection::vec(prop::collection::vec(-6i64..=6, n), n),
            prop::collection::vec(-6i64..=6, n),
        )
    })
}

fn build(rows: &[Vec<i64>], rhs: &[i64]) -> (Matrix, Matrix) {
    let a = Matrix::from_integers(rows).expect("rectangular");
    let b = Matrix::column_vector(rhs.iter().map(|&v| Expr::integer(v)).collect());
    (a, b)
}

proptest! {
    #[test]
    fn exact_solution_satisfies_the_system((rows, rhs) in square_system()) {
        let (a, b) = build(&rows, &rhs);
        if let CramerOutcome::Unique(solution) = solve(&a, &b, true).expect("square system") {
            prop_assert!(solution.verify(&a, &b).expect("shapes agree"));
            for value in solution.values() {
                prop_assert!(matches!(value, SolutionValue::Exact(Expr::Constant(_))));
            }
        }
    }

    #[test]
    fn float_solution_satisfies_the_system((rows, rhs) in square_system()) {
        let (a, b) = build(&rows, &rhs);
        let Some(values) = solve(&a, &b, false).expect("square system").into_values() else {
            return Ok(());
        };
        let x: Vec<f64> = values
            .iter()
            .map(|v| v.to_f64().expect("closed value"))
            .collect();
        for (r, row) in rows.iter().enumerate() {
            let lhs: f64 = row.iter().zip(&x).map(|(&c, &xi)| c as f64 * xi).sum();
            prop_assert!((lhs - rhs[r] as f64).abs() < 1e-6, "row {r}: {lhs} != {}", rhs[r]);
        }
    }

    #[test]
    fn column_replacement_touches_one_column((rows, rhs) in square_system(), pick in any::<prop::sample::Index>()) {
        let (a, b) = build(&rows, &rhs);
        let i = pick.index(a.cols());
        let replaced = a.with_column_replaced(i, &b).expect("valid column");
        for r in 0..a.rows() {
            for c in 0..a.cols() {
                let expected = if c == i { &b[(r, 0)] } else { &a[(r, c)] };
                prop_assert_eq!(&replaced[(r, c)], expected);
            }
        }
    }

    #[test]
    fn solving_twice_gives_identical_results((rows, rhs) in square_system(), symbolic in any::<bool>()) {
        let (a, b) = build(&rows, &rhs);
        let first = solve(&a, &b, symbolic).expect("square system");
        let second = solve(&a, &b, symbolic).expect("square system");
        prop_assert_eq!(first.to_latex(), second.to_latex());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn non_square_matrices_are_rejected(rows in 1usize..=4, extra in 1usize..=3) {
        let a = Matrix::from_integers(&vec![vec![1i64; rows + extra]; rows]).expect("rectangular");
        let b = Matrix::column_vector(vec![Expr::integer(1); rows]);
        prop_assert_eq!(
            solve(&a, &b, true),
            Err(ShapeError::NotSquare { rows, cols: rows + extra })
        );
    }

    #[test]
    fn mismatched_rhs_is_rejected(n in 1usize..=4, m in 1usize..=5) {
        prop_assume!(n != m);
        let a = Matrix::identity(n);
        let b = Matrix::column_vector(vec![Expr::integer(2); m]);
        prop_assert_eq!(
            solve(&a, &b, false),
            Err(ShapeError::RowMismatch { a_rows: n, b_rows: m })
        );
    }
}
