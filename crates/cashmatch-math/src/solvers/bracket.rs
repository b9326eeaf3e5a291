//! Bracket search helpers.

/// An interval with the function evaluated at both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Lower end.
    pub lo: f64,
    /// Upper end.
    pub hi: f64,
    /// Function value at `lo`.
    pub f_lo: f64,
    /// Function value at `hi`.
    pub f_hi: f64,
}

impl Bracket {
    /// True if the function changes sign (or vanishes) across the interval.
    pub fn contains_root(&self) -> bool {
        self.f_lo * self.f_hi <= 0.0
    }
}

/// Widens `[a, b]` symmetrically until the function changes sign.
///
/// Each step moves both ends outward by the current width, so the width
/// triples. The lower end is never moved below `floor`. Gives up after
/// `max_expansions` steps and returns `Ok(None)`.
pub fn expand_bracket<F, E>(
    mut f: F,
    a: f64,
    b: f64,
    floor: f64,
    max_expansions: u32,
) -> Result<Option<Bracket>, E>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let mut lo = a.min(b).max(floor);
    let mut hi = a.max(b).max(floor);
    let mut f_lo = f(lo)?;
    let mut f_hi = f(hi)?;
    let mut expansions = 0;

    while f_lo * f_hi > 0.0 && expansions < max_expansions {
        let width = (hi - lo).max(f64::EPSILON);
        lo = (lo - width).max(floor);
        hi += width;
        f_lo = f(lo)?;
        f_hi = f(hi)?;
        expansions += 1;
    }

    let bracket = Bracket { lo, hi, f_lo, f_hi };
    Ok(bracket.contains_root().then_some(bracket))
}

/// Outcome of scanning a grid for sign changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridScan {
    /// A grid point where the function is exactly zero, found before any
    /// sign change.
    pub exact_root: Option<f64>,
    /// The first adjacent pair with a strict sign change.
    pub first: Option<Bracket>,
    /// Number of strict sign changes across the grid.
    pub sign_changes: usize,
    /// Number of grid points at which the function could be evaluated.
    pub evaluated: usize,
}

/// Evaluates `f` at every grid point in order and records sign changes.
///
/// Points where `f` fails are skipped; adjacency is taken over the points
/// that evaluated successfully.
pub fn scan_grid<F, E>(mut f: F, grid: &[f64]) -> GridScan
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let mut scan = GridScan::default();
    let mut last: Option<(f64, f64)> = None;

    for &x in grid {
        let Ok(fx) = f(x) else {
            continue;
        };
        scan.evaluated += 1;

        if fx == 0.0 && scan.first.is_none() && scan.exact_root.is_none() {
            scan.exact_root = Some(x);
        }

        if let Some((x_prev, f_prev)) = last {
            if f_prev * fx < 0.0 {
                scan.sign_changes += 1;
                if scan.first.is_none() {
                    scan.first = Some(Bracket {
                        lo: x_prev,
                        hi: x,
                        f_lo: f_prev,
                        f_hi: fx,
                    });
                }
            }
        }
        last = Some((x, fx));
    }

    scan
}
