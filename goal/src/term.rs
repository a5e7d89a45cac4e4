use std::rc::Rc;

/// Largest natural number a numeral or a natural fundamental-sequence index
/// may denote. Evaluation up to this bound fits in [`STACK_SIZE`].
pub const MAX_NATURAL: usize = 1000;

/// Stack size for threads evaluating terms with indices up to
/// [`MAX_NATURAL`].
pub const STACK_SIZE: usize = 64 << 20;

/// A principal term `G(a, b, c)`.
#[derive(PartialEq, Eq, Clone, Debug, derive_more::Deref)]
#[deref(forward)]
pub struct Principal(Rc<[Term; 3]>);

/// Summands of a [`Term::Sum`]. Only built by [`Term::from_summands`], so
/// there are always at least two.
#[derive(PartialEq, Eq, Clone, Debug, derive_more::Deref)]
#[deref(forward)]
pub struct Summands(Rc<[Principal]>);

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Term {
    Zero,
    /// Left-to-right ordinal sum of at least two principal terms.
    Sum(Summands),
    Principal(Principal),
}

thread_local! {
    static ONE: Principal = Principal::new(Term::Zero, Term::Zero, Term::Zero);
    static OMEGA: Principal = Principal::new(Term::Zero, Term::Zero, Term::one());
    static LOMEGA: Principal = Principal::new(Term::Zero, Term::one(), Term::Zero);
    static IOTA: Principal = Principal::new(Term::one(), Term::Zero, Term::Zero);
}

impl Principal {
    pub fn new(a: Term, b: Term, c: Term) -> Self {
        Self(Rc::new([a, b, c]))
    }

    /// `G(0,0,0)`
    pub fn one() -> Self {
        ONE.with(Self::clone)
    }
    /// `G(0,0,1)`
    pub fn omega() -> Self {
        OMEGA.with(Self::clone)
    }
    /// `G(0,1,0)`
    pub fn lomega() -> Self {
        LOMEGA.with(Self::clone)
    }
    /// `G(1,0,0)`
    pub fn iota() -> Self {
        IOTA.with(Self::clone)
    }

    pub fn is_one(&self) -> bool {
        self.iter().all(Term::is_zero)
    }
    pub fn is_omega(&self) -> bool {
        self[0].is_zero() && self[1].is_zero() && self[2].is_one()
    }
    pub fn is_lomega(&self) -> bool {
        self[0].is_zero() && self[1].is_one() && self[2].is_zero()
    }
    pub fn is_iota(&self) -> bool {
        self[0].is_one() && self[1].is_zero() && self[2].is_zero()
    }

    /// Copy of `self` with the `n`-th argument overwritten.
    pub fn with_arg(&self, n: usize, arg: Term) -> Self {
        let mut args = (**self).clone();
        args[n] = arg;
        Self(Rc::new(args))
    }
}

impl Term {
    pub fn one() -> Self {
        Principal::one().into()
    }
    pub fn omega() -> Self {
        Principal::omega().into()
    }
    pub fn lomega() -> Self {
        Principal::lomega().into()
    }
    pub fn iota() -> Self {
        Principal::iota().into()
    }

    /// `n` as an `n`-fold sum of `1`.
    pub fn nat(n: usize) -> Self {
        Self::from_summands(vec![Principal::one(); n])
    }

    /// Builds a term from its summands, collapsing the empty and the
    /// singleton case.
    pub fn from_summands(mut summands: Vec<Principal>) -> Self {
        match summands.len() {
            0 => Term::Zero,
            1 => Term::Principal(summands.remove(0)),
            _ => Term::Sum(Summands(summands.into())),
        }
    }

    /// Summands of the term, left to right. Zero has none.
    pub fn summands(&self) -> &[Principal] {
        match self {
            Term::Zero => &[],
            Term::Sum(summands) => &summands[..],
            Term::Principal(p) => std::slice::from_ref(p),
        }
    }

    /// Ordinal addition `self + other`, kept flat.
    pub fn plus(&self, other: &Term) -> Term {
        match (self, other) {
            (Term::Zero, _) => other.clone(),
            (_, Term::Zero) => self.clone(),
            _ => Self::from_summands(
                self.summands()
                    .iter()
                    .chain(other.summands())
                    .cloned()
                    .collect(),
            ),
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Term::Zero)
    }
    pub fn is_one(&self) -> bool {
        self.as_principal().map_or(false, Principal::is_one)
    }

    pub fn as_principal(&self) -> Option<&Principal> {
        match self {
            Term::Principal(p) => Some(p),
            _ => None,
        }
    }
}

impl From<Principal> for Term {
    fn from(p: Principal) -> Self {
        Term::Principal(p)
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::printer::term_to_string(
            self,
            &crate::printer::Options::default(),
        ))
    }
}
