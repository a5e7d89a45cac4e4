use thiserror::Error;

use crate::{prelude::*, term::MAX_NATURAL};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("{term}[{index}] needs a principal fixed-point witness, got `{witness}`")]
    NonPrincipalWitness {
        term: Term,
        index: Term,
        witness: Term,
    },
    #[error("index `{index}` counts more than {limit} successor steps")]
    IndexTooLarge { index: Term, limit: usize },
}
pub type Result<T, E = EvalError> = std::result::Result<T, E>;

/// `s < t`, comparing the summands of both terms lexicographically and
/// principal terms argument by argument.
pub fn less_than(s: &Term, t: &Term) -> bool {
    fn summands_less_than(s: &[Principal], t: &[Principal]) -> bool {
        match (s.split_first(), t.split_first()) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some((s, s_rest)), Some((t, t_rest))) => {
                principal_less_than(s, t) || (s == t && summands_less_than(s_rest, t_rest))
            }
        }
    }
    summands_less_than(s.summands(), t.summands())
}

fn principal_less_than(s: &Principal, t: &Principal) -> bool {
    s.iter()
        .zip(t.iter())
        .find(|(x, y)| x != y)
        .map_or(false, |(x, y)| less_than(x, y))
}

fn less_or_equal(s: &Term, t: &Term) -> bool {
    less_than(s, t) || s == t
}

/// Cofinality class of `s`: `None` for zero, `1` for successors, `ω` for
/// limits of natural-indexed sequences, anything else for larger limits.
pub fn dom(s: &Term) -> Option<Principal> {
    match s {
        Term::Zero => None,
        Term::Sum(summands) => summands.last().map(dom_principal),
        Term::Principal(p) => Some(dom_principal(p)),
    }
}

fn dom_principal(s: &Principal) -> Principal {
    let [a, b, c] = &**s;
    match dom(c) {
        None => match dom(b) {
            None => match dom(a) {
                Some(doma) if !doma.is_one() => doma,
                _ => s.clone(),
            },
            Some(domb) if domb.is_one() => s.clone(),
            Some(domb) if domb.is_omega() => Principal::omega(),
            Some(domb) => {
                if !domb[2].is_zero() {
                    return domb;
                }
                let e = domb[1].clone();
                match dom(&e) {
                    None => s.clone(),
                    Some(dome) if dome.is_one() => domb,
                    Some(_) if less_than(b, &e) => Principal::omega(),
                    Some(_) => domb,
                }
            }
        },
        Some(domc) if domc.is_one() || domc.is_omega() => Principal::omega(),
        Some(domc) => {
            let f = &domc[2];
            if dom(f).is_none() {
                match dom(&domc[1]) {
                    Some(dome) if dome.is_one() => s.clone(),
                    _ => Principal::omega(),
                }
            } else if less_than(c, f) {
                Principal::omega()
            } else {
                domc
            }
        }
    }
}

/// How many times `t[0]` can be taken while `t` stays a positive natural
/// number, i.e. below `ω` with domain `1`. Zero when `t` is not one.
///
/// Only `1` is below `ω` and only `1` has domain `1`, so this counts the
/// trailing `1`s of a sum that starts with `1`.
fn successor_steps(t: &Term) -> Result<usize> {
    let summands = t.summands();
    let steps = match summands.first() {
        Some(first) if first.is_one() => summands.iter().rev().take_while(|p| p.is_one()).count(),
        _ => 0,
    };
    if steps > MAX_NATURAL {
        return Err(EvalError::IndexTooLarge {
            index: t.clone(),
            limit: MAX_NATURAL,
        });
    }
    Ok(steps)
}

/// Suffix of `s` starting at the first summand whose `n`-th argument is
/// `key`, or its last summand when there is none.
fn find(n: usize, s: &Term, key: &Term) -> Term {
    match s {
        Term::Zero => Term::Zero,
        Term::Principal(_) => s.clone(),
        Term::Sum(summands) => {
            let start = summands
                .iter()
                .position(|p| &p[n] == key)
                .unwrap_or(summands.len().saturating_sub(1));
            Term::from_summands(summands[start..].to_vec())
        }
    }
}

/// Overwrites the `n`-th argument of every summand of `s` with `arg`.
fn replace(n: usize, s: &Term, arg: &Term) -> Term {
    Term::from_summands(
        s.summands()
            .iter()
            .map(|p| p.with_arg(n, arg.clone()))
            .collect(),
    )
}

/// The `t`-th element of the fundamental sequence of `s`, written `s[t]`.
pub fn fund(s: &Term, t: &Term) -> Result<Term> {
    match s {
        Term::Zero => Ok(Term::Zero),
        Term::Sum(summands) => {
            let Some((last, init)) = summands.split_last() else {
                return Ok(Term::Zero);
            };
            let last = fund_principal(last, t)?;
            Ok(Term::from_summands(init.to_vec()).plus(&last))
        }
        Term::Principal(p) => fund_principal(p, t),
    }
}

fn fund_principal(s: &Principal, t: &Term) -> Result<Term> {
    let [a, b, c] = &**s;
    let term = match dom(c) {
        None => match dom(b) {
            None => match dom(a) {
                Some(doma) if !doma.is_one() => s.with_arg(0, fund(a, t)?),
                _ => return Ok(t.clone()),
            },
            Some(domb) if domb.is_one() => return Ok(t.clone()),
            Some(domb) if domb.is_omega() => s.with_arg(1, fund(b, t)?),
            Some(domb) => s.with_arg(1, fund(b, &second_index(s, t, &domb)?)?),
        },
        Some(domc) if domc.is_one() => {
            // s[n] = s[n-1] + G(a,b,c[0]), unrolled
            let steps = successor_steps(t)?;
            if steps == 0 {
                return Ok(Term::Zero);
            }
            let last = s.with_arg(2, fund(c, &Term::Zero)?);
            return Ok(Term::from_summands(vec![last; steps]));
        }
        Some(domc) if domc.is_omega() => s.with_arg(2, fund(c, t)?),
        Some(domc) => s.with_arg(2, fund(c, &third_index(s, t, &domc)?)?),
    };
    Ok(term.into())
}

/// `s[t - 1]`, which has to be a principal term again.
fn witness(s: &Principal, t: &Term) -> Result<Principal> {
    tracing::trace!(term = %Term::from(s.clone()), index = %t, "evaluating fixed-point witness");
    match fund_principal(s, &fund(t, &Term::Zero)?)? {
        Term::Principal(p) => Ok(p),
        witness => Err(EvalError::NonPrincipalWitness {
            term: s.clone().into(),
            index: t.clone(),
            witness,
        }),
    }
}

/// Index fed into the second argument `b` of `s` when `dom(b)` is larger
/// than `ω`.
fn second_index(s: &Principal, t: &Term, domb: &Principal) -> Result<Term> {
    let b = &s[1];
    let [_, e, f] = &**domb;
    if !f.is_zero() {
        return Ok(t.clone());
    }
    let dome = match dom(e) {
        Some(dome) if !dome.is_one() => dome,
        _ => return Ok(t.clone()),
    };
    if less_or_equal(e, b) {
        return Ok(t.clone());
    }
    if successor_steps(t)? == 0 {
        return Ok(Term::Zero);
    }
    tracing::trace!(index = %t, "diagonalizing second argument");
    let mut gamma = witness(s, t)?[1].clone();
    if let Term::Sum(summands) = b {
        if let Some(last) = summands.last() {
            gamma = find(0, &gamma, &last[0]);
        }
    }
    Ok(replace(0, &gamma, &fund(&dome[0], &Term::Zero)?))
}

/// Index fed into the third argument `c` of `s` when `dom(c)` is larger
/// than `ω`.
fn third_index(s: &Principal, t: &Term, domc: &Principal) -> Result<Term> {
    let [_, b, c] = &**s;
    let [d, e, f] = &**domc;
    let Some(domf) = dom(f) else {
        let g = match dom(e) {
            None => d.clone(),
            Some(dome) if dome.is_one() => return Ok(t.clone()),
            Some(dome) => dome[0].clone(),
        };
        let gamma = if successor_steps(t)? > 0 {
            tracing::trace!(index = %t, "diagonalizing third argument");
            witness(s, t)?[2].clone()
        } else {
            Term::Zero
        };
        return Ok(Principal::new(fund(&g, &Term::Zero)?, gamma, Term::Zero).into());
    };
    if less_or_equal(f, c) {
        return Ok(t.clone());
    }
    if successor_steps(t)? == 0 {
        return Ok(Term::Zero);
    }
    tracing::trace!(index = %t, "diagonalizing third argument");
    let mut gamma = witness(s, t)?[2].clone();
    if let Term::Sum(summands) = b {
        if let Some(last) = summands.last() {
            gamma = find(1, &gamma, &last[1]);
        }
    }
    Ok(replace(1, &gamma, &fund(&domf[1], &Term::Zero)?))
}
