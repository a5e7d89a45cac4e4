use crate::prelude::*;

/// Head glyph written by the printer.
pub const HEAD: char = 'G';

/// Display switches. The order of the fields is the order of the flag
/// vector accepted by `From<[bool; 9]>`.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
pub struct Options {
    /// `G(0,0,1)` as `ω`
    pub omega: bool,
    /// `G(0,1,0)` as `Ω`
    pub large_omega: bool,
    /// `G(1,0,0)` as `I`
    pub iota: bool,
    /// `G(a,b,c)` as `G_a(b,c)`
    pub subscript: bool,
    /// Braces around every subscript.
    pub braces: bool,
    /// `G(0,b,c)` as `G(b,c)`
    pub elide: bool,
    /// With `elide`, `G(b,c)` as `G_b(c)`
    pub subscript_elided: bool,
    /// With `elide`, `G(0,0,c)` as `G(c)`
    pub elide_second: bool,
    pub tex: bool,
}

impl Options {
    pub const FLAGS: [&'static str; 9] = [
        "omega",
        "large-omega",
        "iota",
        "subscript",
        "braces",
        "elide",
        "subscript-elided",
        "elide-second",
        "tex",
    ];

    pub fn flag_mut(&mut self, name: &str) -> Option<&mut bool> {
        Some(match name {
            "omega" | "w" => &mut self.omega,
            "large-omega" | "W" => &mut self.large_omega,
            "iota" | "i" => &mut self.iota,
            "subscript" => &mut self.subscript,
            "braces" => &mut self.braces,
            "elide" => &mut self.elide,
            "subscript-elided" => &mut self.subscript_elided,
            "elide-second" => &mut self.elide_second,
            "tex" => &mut self.tex,
            _ => return None,
        })
    }

    pub fn flags(&self) -> [bool; 9] {
        [
            self.omega,
            self.large_omega,
            self.iota,
            self.subscript,
            self.braces,
            self.elide,
            self.subscript_elided,
            self.elide_second,
            self.tex,
        ]
    }
}

impl From<[bool; 9]> for Options {
    fn from(flags: [bool; 9]) -> Self {
        let [omega, large_omega, iota, subscript, braces, elide, subscript_elided, elide_second, tex] =
            flags;
        Self {
            omega,
            large_omega,
            iota,
            subscript,
            braces,
            elide,
            subscript_elided,
            elide_second,
            tex,
        }
    }
}

impl std::fmt::Display for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (name, on)) in Self::FLAGS.iter().zip(self.flags()).enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_fmt(format_args!("{name:<18}{}", if on { "on" } else { "off" }))?;
        }
        Ok(())
    }
}

pub fn term_to_string(term: &Term, options: &Options) -> String {
    match term {
        Term::Zero => "0".to_owned(),
        Term::Sum(summands) => summands
            .iter()
            .map(|p| principal_to_string(p, options))
            .collect::<Vec<_>>()
            .join("+"),
        Term::Principal(p) => principal_to_string(p, options),
    }
}

fn principal_to_string(p: &Principal, options: &Options) -> String {
    let show = |t: &Term| term_to_string(t, options);
    let [a, b, c] = &**p;
    if options.elide && a.is_zero() {
        if options.elide_second && b.is_zero() {
            format!("{HEAD}({})", show(c))
        } else if options.subscript_elided {
            format!("{}({})", subscript(b, options), show(c))
        } else {
            format!("{HEAD}({},{})", show(b), show(c))
        }
    } else if options.subscript {
        format!("{}({},{})", subscript(a, options), show(b), show(c))
    } else {
        format!("{HEAD}({},{},{})", show(a), show(b), show(c))
    }
}

fn subscript(sub: &Term, options: &Options) -> String {
    let bare = !(options.braces || options.tex)
        && match sub {
            Term::Zero => true,
            Term::Sum(summands) => summands.iter().all(Principal::is_one),
            Term::Principal(p) => {
                p.is_one()
                    || (options.omega && p.is_omega())
                    || (options.large_omega && p.is_lomega())
                    || (options.iota && p.is_iota())
            }
        };
    let sub = term_to_string(sub, options);
    if bare {
        format!("{HEAD}_{sub}")
    } else {
        format!("{HEAD}_{{{sub}}}")
    }
}

const ONE_FORMS: [&str; 7] = [
    "G(0)",
    "G_{0}(0)",
    "G_0(0)",
    "G(0,0)",
    "G_{0}(0,0)",
    "G_0(0,0)",
    "G(0,0,0)",
];
const OMEGA_FORMS: [&str; 7] = [
    "G(1)",
    "G_{0}(1)",
    "G_0(1)",
    "G(0,1)",
    "G_{0}(0,1)",
    "G_0(0,1)",
    "G(0,0,1)",
];
const LARGE_OMEGA_FORMS: [&str; 6] = [
    "G_{1}(0)",
    "G_1(0)",
    "G(1,0)",
    "G_{0}(1,0)",
    "G_0(1,0)",
    "G(0,1,0)",
];
const IOTA_FORMS: [&str; 3] = ["G_{1}(0,0)", "G_1(0,0)", "G(1,0,0)"];

fn replace_all(text: String, forms: &[&str], with: &str) -> String {
    forms
        .iter()
        .fold(text, |text, form| text.replace(form, with))
}

/// Rewrites printed notation into its short form: constants become `1`,
/// `ω`, `Ω` and `I`, and runs of `1+1+...+1` become decimal numerals.
/// Not idempotent in TeX mode.
pub fn abbreviate(text: &str, options: &Options) -> String {
    let mut text = replace_all(text.to_owned(), &ONE_FORMS, "1");
    if options.omega {
        text = replace_all(text, &OMEGA_FORMS, "ω");
    }
    if options.large_omega {
        text = replace_all(text, &LARGE_OMEGA_FORMS, "Ω");
    }
    if options.iota {
        text = replace_all(text, &IOTA_FORMS, "I");
    }
    if options.tex {
        text = to_tex(&text);
    }
    fold_numerals(&text)
}

fn to_tex(text: &str) -> String {
    text.replace('G', "\\textrm{G}")
        .replace('ω', "\\omega")
        .replace('Ω', "\\Omega")
        .replace('I', "\\textrm{I}")
}

/// `1+1+1` -> `3`
fn fold_numerals(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("1+1") {
        folded.push_str(&rest[..start]);
        let mut count = 1;
        rest = &rest[start + 1..];
        while let Some(tail) = rest.strip_prefix("+1") {
            count += 1;
            rest = tail;
        }
        folded.push_str(&count.to_string());
    }
    folded.push_str(rest);
    folded
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;
    use crate::{parser::parse_term, term::test::arb_term};

    fn parse(s: &str) -> Term {
        parse_term(s).unwrap()
    }

    fn render(s: &str, options: &Options) -> String {
        abbreviate(&term_to_string(&parse(s), options), options)
    }

    fn symbols() -> Options {
        Options {
            omega: true,
            large_omega: true,
            iota: true,
            ..Options::default()
        }
    }

    #[test]
    fn test_plain() {
        let options = Options::default();
        assert_eq!(term_to_string(&Term::Zero, &options), "0");
        assert_eq!(term_to_string(&Term::one(), &options), "G(0,0,0)");
        assert_eq!(term_to_string(&Term::omega(), &options), "G(0,0,G(0,0,0))");
        assert_eq!(
            term_to_string(&parse("w+1"), &options),
            "G(0,0,G(0,0,0))+G(0,0,0)"
        );
        assert_eq!(Term::lomega().to_string(), "G(0,G(0,0,0),0)");
    }

    #[test]
    fn test_elision() {
        let elide = Options {
            elide: true,
            ..Options::default()
        };
        assert_eq!(term_to_string(&parse("G(0,w,w)"), &elide), "G(G(0,G(0,0)),G(0,G(0,0)))");
        assert_eq!(render("G(0,w,w)", &elide), "G(G(0,1),G(0,1))");
        let elide_both = Options {
            elide_second: true,
            ..elide
        };
        assert_eq!(render("G(0,0,w)", &elide_both), "G(G(1))");
        assert_eq!(render("G(1,0,0)", &elide_both), "G(1,0,0)");
    }

    #[test]
    fn test_subscripts() {
        let options = Options {
            subscript: true,
            ..Options::default()
        };
        assert_eq!(render("G(2,w,0)", &options), "G_2(G_0(0,1),0)");
        assert_eq!(render("G(w,0,0)", &options), "G_{G_0(0,1)}(0,0)");
        let options = Options {
            omega: true,
            ..options
        };
        assert_eq!(render("G(w,0,0)", &options), "G_ω(0,0)");
        let options = Options {
            braces: true,
            ..options
        };
        assert_eq!(render("G(2,0,1)", &options), "G_{2}(0,1)");
        assert_eq!(render("G(0,0,w)", &options), "G_{0}(0,ω)");
    }

    #[test]
    fn test_elided_subscripts() {
        let options = Options {
            elide: true,
            subscript_elided: true,
            ..symbols()
        };
        assert_eq!(render("G(0,W,w)", &options), "G_Ω(ω)");
        assert_eq!(render("G(0,w+1,0)", &options), "G_{ω+1}(0)");
        assert_eq!(render("G(0,3,0)", &options), "G_3(0)");
        assert_eq!(render("G(0,0,2)", &options), "G_0(2)");
    }

    #[test]
    fn test_symbols() {
        let options = symbols();
        assert_eq!(render("w", &options), "ω");
        assert_eq!(render("W", &options), "Ω");
        assert_eq!(render("I", &options), "I");
        assert_eq!(render("G(I,W,w+3)", &options), "G(I,Ω,ω+3)");
        assert_eq!(render("w", &Options::default()), "G(0,0,1)");
    }

    #[test]
    fn test_tex() {
        let options = Options {
            tex: true,
            ..symbols()
        };
        assert_eq!(render("w+W+I+2", &options), "\\omega+\\Omega+\\textrm{I}+2");
        assert_eq!(
            render("G(0,w,0)", &options),
            "\\textrm{G}(0,\\omega,0)"
        );
        let options = Options {
            subscript: true,
            ..options
        };
        assert_eq!(render("G(2,0,1)", &options), "\\textrm{G}_{2}(0,1)");
    }

    #[test]
    fn test_fold_numerals() {
        assert_eq!(fold_numerals("1"), "1");
        assert_eq!(fold_numerals("1+1"), "2");
        assert_eq!(fold_numerals("ω+1+1+1"), "ω+3");
        assert_eq!(fold_numerals("G(1+1,ω+1)+1+1"), "G(2,ω+1)+2");
        assert_eq!(fold_numerals("1+1+1+1+1+1+1+1+1+1+1+1"), "12");
    }

    #[test]
    fn test_abbreviate_is_idempotent() {
        let options = symbols();
        for s in ["3", "ω+2", "G(0,0,12)", "G(1,0,0)+1+1", "G_1(0)"] {
            let once = abbreviate(s, &options);
            assert_eq!(abbreviate(&once, &options), once, "{s}");
        }
    }

    #[test]
    fn test_options_from_flags() {
        let mut flags = [false; 9];
        flags[0] = true;
        flags[8] = true;
        let options = Options::from(flags);
        assert!(options.omega && options.tex);
        assert!(!options.subscript);
        assert_eq!(options.flags(), flags);
    }

    #[test]
    fn test_flag_mut() {
        let mut options = Options::default();
        for name in Options::FLAGS {
            *options.flag_mut(name).unwrap() = true;
        }
        assert_eq!(options.flags(), [true; 9]);
        assert!(options.flag_mut("bogus").is_none());
    }

    proptest! {
        #[test]
        fn abbreviation_is_idempotent(t in arb_term(), flags in any::<[bool; 9]>()) {
            let options = Options { tex: false, ..Options::from(flags) };
            let once = abbreviate(&term_to_string(&t, &options), &options);
            prop_assert_eq!(abbreviate(&once, &options), once);
        }
    }
}
