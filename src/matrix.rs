//! Dense row-major matrices of symbolic entries.

use std::fmt;
use std::ops::Index;

use crate::error::ShapeError;
use crate::expr::{Expr, one, zero};
use crate::format::{matrix_latex, pretty};
use crate::simplify::{simplify_add, simplify_fully, simplify_mul, simplify_neg, substitute};

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Expr>,
}

impl Matrix {
    /// Build a matrix from nested rows. Every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<Expr>>) -> Result<Self, ShapeError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (row, entries) in rows.into_iter().enumerate() {
            if entries.len() != n_cols {
                return Err(ShapeError::RaggedRows {
                    row,
                    expected: n_cols,
                    found: entries.len(),
                });
            }
            data.extend(entries);
        }
        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }

    pub fn from_integers<R: AsRef<[i64]>>(rows: &[R]) -> Result<Self, ShapeError> {
        Self::from_rows(
            rows.iter()
                .map(|row| row.as_ref().iter().map(|&v| Expr::integer(v)).collect())
                .collect(),
        )
    }

    /// An n×1 matrix holding `entries` top to bottom.
    pub fn column_vector(entries: Vec<Expr>) -> Self {
        Self {
            rows: entries.len(),
            cols: 1,
            data: entries,
        }
    }

    pub fn identity(n: usize) -> Self {
        let data = (0..n * n)
            .map(|i| if i / n == i % n { one() } else { zero() })
            .collect();
        Self {
            rows: n,
            cols: n,
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Expr> {
        if row < self.rows && col < self.cols {
            Some(&self.data[self.idx(row, col)])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> &[Expr] {
        let start = self.idx(row, 0);
        &self.data[start..start + self.cols]
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = &Expr> + '_ {
        self.data.iter().skip(col).step_by(self.cols.max(1)).take(self.rows)
    }

    /// Entries in row-major order.
    pub fn entries(&self) -> &[Expr] {
        &self.data
    }

    /// A fresh copy with column `index` replaced by the column vector `b`.
    pub fn with_column_replaced(&self, index: usize, b: &Matrix) -> Result<Matrix, ShapeError> {
        if b.cols != 1 {
            return Err(ShapeError::NotColumnVector { cols: b.cols });
        }
        if b.rows != self.rows {
            return Err(ShapeError::RowMismatch {
                a_rows: self.rows,
                b_rows: b.rows,
            });
        }
        if index >= self.cols {
            return Err(ShapeError::ColumnOutOfRange {
                index,
                cols: self.cols,
            });
        }

        let mut out = self.clone();
        for (row, value) in b.data.iter().enumerate() {
            let idx = out.idx(row, index);
            out.data[idx] = value.clone();
        }
        Ok(out)
    }

    /// Exact determinant by Laplace (cofactor) expansion along the first row.
    pub fn determinant(&self) -> Result<Expr, ShapeError> {
        if !self.is_square() {
            return Err(ShapeError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(simplify_fully(self.laplace()))
    }

    fn laplace(&self) -> Expr {
        match self.rows {
            0 => one(),
            1 => self.data[0].clone(),
            2 => simplify_add(
                simplify_mul(self.data[0].clone(), self.data[3].clone()),
                simplify_neg(simplify_mul(self.data[1].clone(), self.data[2].clone())),
            ),
            n => {
                let mut acc = zero();
                for col in 0..n {
                    let entry = &self.data[col];
                    if entry.is_zero() {
                        continue;
                    }
                    let term = simplify_mul(entry.clone(), self.minor(0, col).laplace());
                    let term = if col % 2 == 0 { term } else { simplify_neg(term) };
                    acc = simplify_add(acc, term);
                }
                acc
            }
        }
    }

    /// The matrix with `skip_row` and `skip_col` removed.
    fn minor(&self, skip_row: usize, skip_col: usize) -> Matrix {
        let data = (0..self.rows)
            .filter(|&r| r != skip_row)
            .flat_map(|r| {
                (0..self.cols)
                    .filter(move |&c| c != skip_col)
                    .map(move |c| self.data[self.idx(r, c)].clone())
            })
            .collect();
        Matrix {
            rows: self.rows - 1,
            cols: self.cols - 1,
            data,
        }
    }

    /// Exact matrix product `self · other`.
    pub fn mul(&self, other: &Matrix) -> Result<Matrix, ShapeError> {
        if self.cols != other.rows {
            return Err(ShapeError::ProductMismatch {
                left_cols: self.cols,
                right_rows: other.rows,
            });
        }
        let mut data = Vec::with_capacity(self.rows * other.cols);
        for r in 0..self.rows {
            for c in 0..other.cols {
                let sum = (0..self.cols).fold(zero(), |acc, k| {
                    simplify_add(
                        acc,
                        simplify_mul(
                            self.data[self.idx(r, k)].clone(),
                            other.data[other.idx(k, c)].clone(),
                        ),
                    )
                });
                data.push(simplify_fully(sum));
            }
        }
        Ok(Matrix {
            rows: self.rows,
            cols: other.cols,
            data,
        })
    }

    pub fn map(self, f: impl FnMut(Expr) -> Expr) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.into_iter().map(f).collect(),
        }
    }

    /// Replace `var` by `value` in every entry and simplify.
    pub fn substitute(&self, var: &str, value: &Expr) -> Matrix {
        self.clone()
            .map(|entry| simplify_fully(substitute(&entry, var, value)))
    }

    /// `\begin{pmatrix} … \end{pmatrix}` markup.
    pub fn to_latex(&self) -> String {
        matrix_latex(self)
    }

    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = Expr;

    fn index(&self, (row, col): (usize, usize)) -> &Expr {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        &self.data[self.idx(row, col)]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for r in 0..self.rows {
            if r > 0 {
                write!(f, ", ")?;
            }
            let row: Vec<String> = self.row(r).iter().map(pretty).collect();
            write!(f, "[{}]", row.join(", "))?;
        }
        write!(f, "]")
    }
}
