//! Reaction records and the per-database parsers. Each supported database
//! format (KIDA, UMIST, LEEDS, UCLCHEM, KROME and the crate's own native
//! CSV) has a parser that turns one text record into a [`Reaction`] with the
//! canonical [`ReactionType`], and a rate-expression generator that renders
//! the reaction rate coefficient as a C expression string.
pub mod converter;
pub mod kida;
pub mod krome;
pub mod leeds;
pub mod native;
pub mod uclchem;
pub mod umist;

use crate::error::ChemNetError;
use crate::grains::{GrainModel, GrainRates};
use crate::reactiontype::ReactionType;
use crate::species::{ChemContext, Species};
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

pub use kida::KidaParser;
pub use krome::KromeParser;
pub use leeds::LeedsParser;
pub use native::NativeParser;
pub use uclchem::UclchemParser;
pub use umist::UmistParser;

/// Supported reaction database formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Format {
    Kida,
    Umist,
    Leeds,
    Uclchem,
    Krome,
    Native,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Kida => "kida",
            Format::Umist => "umist",
            Format::Leeds => "leeds",
            Format::Uclchem => "uclchem",
            Format::Krome => "krome",
            Format::Native => "native",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for Format {
    type Err = ChemNetError;
    fn from_str(s: &str) -> Result<Format, ChemNetError> {
        match s.to_lowercase().as_str() {
            "kida" => Ok(Format::Kida),
            "umist" | "rate12" => Ok(Format::Umist),
            "leeds" => Ok(Format::Leeds),
            "uclchem" => Ok(Format::Uclchem),
            "krome" => Ok(Format::Krome),
            "native" => Ok(Format::Native),
            other => Err(ChemNetError::UnknownTypeCode {
                format: "format name".to_string(),
                code: other.to_string(),
            }),
        }
    }
}

/// Symbol names the rate expressions of a given format are written in.
/// UCLCHEM networks carry no separate dust temperature and normalize the
/// cosmic-ray ionization rate to the ISM value; LEEDS splits the ionization
/// rate into cosmic-ray and X-ray contributions.
#[derive(Debug, Clone, Copy)]
pub struct RateSymbols {
    pub tgas: &'static str,
    pub tdust: &'static str,
    pub crrate: &'static str,
    pub zism: &'static str,
    pub radfield: &'static str,
    pub av: &'static str,
    pub h2form: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reaction {
    pub reactants: Vec<Species>,
    pub products: Vec<Species>,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    /// Valid temperature range in K; the full range when the database does
    /// not constrain it.
    pub temp_min: f64,
    pub temp_max: f64,
    pub reaction_type: ReactionType,
    pub format: Format,
    /// Index carried in the database file, -1 when the format has none.
    pub idxfromfile: i64,
    /// Literal rate expression for formats that ship one (KROME).
    pub rate_string: Option<String>,
}

impl Reaction {
    pub fn new(format: Format) -> Reaction {
        Reaction {
            reactants: Vec::new(),
            products: Vec::new(),
            alpha: 0.0,
            beta: 0.0,
            gamma: 0.0,
            temp_min: -9999.0,
            temp_max: 9999.0,
            reaction_type: ReactionType::Unknown,
            format,
            idxfromfile: -1,
            rate_string: None,
        }
    }

    /// A record that produced neither reactants nor products, e.g. a line
    /// of pure pseudo species.
    pub fn is_empty(&self) -> bool {
        self.reactants.is_empty() && self.products.is_empty()
    }

    /// True when the species takes part on either side.
    pub fn contains(&self, species: &Species) -> bool {
        self.reactants.contains(species) || self.products.contains(species)
    }

    /// Compact "A + B -> C" form for log lines.
    pub fn short(&self) -> String {
        let side = |list: &[Species]| {
            list.iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(" + ")
        };
        format!("{} -> {}", side(&self.reactants), side(&self.products))
    }

    /// Key for the string-based duplicate scan: chemical content, validity
    /// range and type, no provenance. Two records that differ only in
    /// format, file index or rate string map to the same key.
    pub fn dedup_key(&self) -> String {
        format!(
            "{} -> {} [{}, {}] {}",
            Reaction::sorted_names(&self.reactants).join(" + "),
            Reaction::sorted_names(&self.products).join(" + "),
            self.temp_min,
            self.temp_max,
            self.reaction_type
        )
    }

    pub fn symbols(&self) -> RateSymbols {
        match self.format {
            Format::Uclchem => RateSymbols {
                tgas: "Tgas",
                tdust: "Tgas",
                crrate: "zeta",
                zism: "zism",
                radfield: "G0",
                av: "Av",
                h2form: "(1.0e-17 * sqrt(Tgas) * y[IDX_HI] * nH)",
            },
            Format::Leeds => RateSymbols {
                tgas: "Tgas",
                tdust: "Tdust",
                crrate: "zeta_cr",
                zism: "zism",
                radfield: "G0",
                av: "Av",
                h2form: "H2formation",
            },
            _ => RateSymbols {
                tgas: "Tgas",
                tdust: "Tdust",
                crrate: "zeta",
                zism: "zism",
                radfield: "G0",
                av: "Av",
                h2form: "H2formation",
            },
        }
    }

    /// Render the rate coefficient of this reaction as a C expression.
    /// Grain-surface processes are delegated to the grain model; gas-phase
    /// formulas depend on both the reaction type and the database the
    /// record came from, since each database defines its own conventions.
    pub fn rate_expr(&self, grain: Option<&GrainModel>) -> Result<String, ChemNetError> {
        use ReactionType::*;

        if self.format == Format::Krome {
            let raw = self.rate_string.as_deref().ok_or_else(|| {
                ChemNetError::RateExpression(format!("krome reaction {} has no rate string", self))
            })?;
            return converter::fortran_to_c(raw);
        }

        if self.reaction_type.is_grain_process() {
            // LEEDS tabulates surface diffusion but gives it no rate law
            if self.format == Format::Leeds && self.reaction_type == SurfaceDiffusion {
                return Ok("0.0".to_string());
            }
            let grain = grain.ok_or_else(|| {
                ChemNetError::GrainModelRequired(self.reaction_type.to_string())
            })?;
            return grain.rateexpr(self);
        }

        let a = fnum(self.alpha);
        let b = fnum(self.beta);
        let c = fnum(self.gamma);

        let rate = match (self.format, self.reaction_type) {
            (_, Dummy) | (_, GasLeedsXRay) => "0.0".to_string(),
            (Format::Leeds, GasTwobody) => format!(
                "{} * pow(Tgas/300.0, {}) * {}",
                a,
                b,
                exp_term(self.gamma, "Tgas")
            ),
            (_, GasTwobody) => self.arrhenius(),
            (Format::Leeds, GasCosmicRay) => format!("{} * (zeta_cr + zeta_xr) / zism", a),
            (Format::Uclchem, GasCosmicRay) => format!("{} * (zeta / zism)", a),
            // UMIST tabulates CRP rates already scaled to the ionization rate
            (Format::Umist, GasCosmicRay) => a.clone(),
            (_, GasCosmicRay) => format!("{} * zeta", a),
            (Format::Leeds, GasPhoton) => {
                format!("G0 * {} * {}", a, exp_prod(self.gamma, "Av"))
            }
            (Format::Uclchem, GasPhoton) => self.uclchem_photon_rate(),
            (_, GasPhoton) => format!("{} * {}", a, exp_prod(self.gamma, "Av")),
            (_, GasKidaIP1) => format!(
                "{} * {} * (0.62 + 0.4767 * {} * sqrt(300.0/Tgas))",
                a, b, c
            ),
            (_, GasKidaIP2) => format!(
                "{} * {} * (1.0 + 0.0967 * {} * sqrt(300.0/Tgas) + {} * {} * 300.0/(10.526 * Tgas))",
                a, b, c, c, c
            ),
            (Format::Leeds, GasUmistCRPhot) => format!(
                "{} * pow(Tgas/300.0, {}) * {} * (zeta_cr + zeta_xr) / zism / (1.0 - albedo)",
                a, b, c
            ),
            (Format::Uclchem, GasUmistCRPhot) => format!(
                "{} * (zeta / zism) * pow(Tgas/300.0, {}) * {} / (1.0 - omega)",
                a, b, c
            ),
            (Format::Umist, GasUmistCRPhot) => format!(
                "{} * pow(Tgas/300.0, {}) * {} / (1.0 - omega)",
                a, b, c
            ),
            (_, GasUmistCRPhot) => format!(
                "{} * zeta * pow(Tgas/300.0, {}) * {} / (1.0 - omega)",
                a, b, c
            ),
            (_, rtype) => return Err(ChemNetError::UnimplementedRate(rtype.to_string())),
        };
        Ok(rate)
    }

    /// Modified Arrhenius form; unit factors are dropped instead of being
    /// rendered as pow(..., 0.0) or exp(-0.0/Tgas).
    fn arrhenius(&self) -> String {
        let mut parts = vec![fnum(self.alpha)];
        if self.beta != 0.0 {
            parts.push(format!("pow(Tgas/300.0, {})", fnum(self.beta)));
        }
        if self.gamma != 0.0 {
            parts.push(exp_term(self.gamma, "Tgas"));
        }
        parts.join(" * ")
    }

    fn uclchem_photon_rate(&self) -> String {
        let a = fnum(self.alpha);
        if let Some(re1) = self.reactants.first() {
            if re1.name == "CO" {
                let shield = format!(
                    "GetShieldingFactor(IDX_{}, h2col, {}col, Tgas, 1)",
                    re1.alias,
                    re1.name.to_lowercase()
                );
                // Habing to Draine conversion, following the UCLCHEM treatment
                return format!(
                    "(2.0e-10) * G0 * {} * GetGrainScattering(Av, lambdabar) / 1.7",
                    shield
                );
            }
        }
        format!("G0 * {} * {} / 1.7", a, exp_prod(self.gamma, "Av"))
    }

    fn sorted_names(list: &[Species]) -> Vec<&str> {
        let mut names: Vec<&str> = list
            .iter()
            .map(|s| if s.is_electron() { "e-" } else { s.name.as_str() })
            .collect();
        names.sort_unstable();
        names
    }
}

/// Reactions compare by chemical content and validity range; provenance
/// (format, file index, rate string) is ignored so that the same reaction
/// read from two databases is recognized as a duplicate. An Unknown type
/// matches any type.
impl PartialEq for Reaction {
    fn eq(&self, other: &Self) -> bool {
        Reaction::sorted_names(&self.reactants) == Reaction::sorted_names(&other.reactants)
            && Reaction::sorted_names(&self.products) == Reaction::sorted_names(&other.products)
            && self.temp_min == other.temp_min
            && self.temp_max == other.temp_max
            && (self.reaction_type == other.reaction_type
                || self.reaction_type == ReactionType::Unknown
                || other.reaction_type == ReactionType::Unknown)
    }
}
impl Eq for Reaction {}

impl Hash for Reaction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Reaction::sorted_names(&self.reactants).hash(state);
        Reaction::sorted_names(&self.products).hash(state);
        self.temp_min.to_bits().hash(state);
        self.temp_max.to_bits().hash(state);
        // reaction_type stays out: Unknown compares equal to any type
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reac = self
            .reactants
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(" + ");
        let prod = self
            .products
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(" + ");
        write!(
            f,
            "{:<20} -> {:<32}, {:7.1} < T < {:7.1}, Type: {}, Format: {}, Index: {}",
            reac, prod, self.temp_min, self.temp_max, self.reaction_type, self.format, self.idxfromfile
        )
    }
}

/// One-record parser for a database format. Stateful where the format
/// demands it: KROME layout directives change how subsequent lines are
/// read, so a parser instance should live for exactly one input file.
#[enum_dispatch]
pub trait RecordParser {
    /// Parse a single line. Blank lines, comments and directives yield
    /// Ok(None).
    fn parse_line(
        &mut self,
        line: &str,
        ctx: &ChemContext,
    ) -> Result<Option<Reaction>, ChemNetError>;
}

#[enum_dispatch(RecordParser)]
#[derive(Debug, Clone)]
pub enum FormatParser {
    Kida(KidaParser),
    Umist(UmistParser),
    Leeds(LeedsParser),
    Uclchem(UclchemParser),
    Krome(KromeParser),
    Native(NativeParser),
}

impl FormatParser {
    pub fn new(format: Format) -> FormatParser {
        match format {
            Format::Kida => KidaParser::default().into(),
            Format::Umist => UmistParser::default().into(),
            Format::Leeds => LeedsParser::default().into(),
            Format::Uclchem => UclchemParser::default().into(),
            Format::Krome => KromeParser::default().into(),
            Format::Native => NativeParser::default().into(),
        }
    }
}

/// Turn one species token into a Species, skipping blanks and pseudo
/// species (CR, Photon, ...) which carry no abundance.
pub(crate) fn create_species(
    token: &str,
    ctx: &ChemContext,
) -> Result<Option<Species>, ChemNetError> {
    let token = token.trim();
    if token.is_empty() || token == "NAN" || ctx.pseudo_elements.iter().any(|p| p == token) {
        return Ok(None);
    }
    Species::parse(token, ctx).map(Some)
}

/// Format a float the way rate tables read: plain decimal in the humane
/// range, scientific notation outside of it.
pub(crate) fn fnum(x: f64) -> String {
    if x == 0.0 {
        return "0.0".to_string();
    }
    let mag = x.abs();
    if (1e-3..1e7).contains(&mag) {
        let s = format!("{}", x);
        if s.contains('.') { s } else { format!("{}.0", s) }
    } else {
        format!("{:e}", x)
    }
}

/// exp(-c/denom) with the sign folded into the literal.
pub(crate) fn exp_term(c: f64, denom: &str) -> String {
    if c >= 0.0 {
        format!("exp(-{}/{})", fnum(c), denom)
    } else {
        format!("exp({}/{})", fnum(-c), denom)
    }
}

/// exp(-c*var), used for the visual-extinction attenuation of photo rates.
pub(crate) fn exp_prod(c: f64, var: &str) -> String {
    if c >= 0.0 {
        format!("exp(-{}*{})", fnum(c), var)
    } else {
        format!("exp({}*{})", fnum(-c), var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species(names: &[&str]) -> Vec<Species> {
        let ctx = ChemContext::default();
        names
            .iter()
            .map(|n| Species::parse(n, &ctx).unwrap())
            .collect()
    }

    fn two_body(reactants: &[&str], products: &[&str], a: f64, b: f64, c: f64) -> Reaction {
        let mut reac = Reaction::new(Format::Native);
        reac.reactants = species(reactants);
        reac.products = species(products);
        reac.alpha = a;
        reac.beta = b;
        reac.gamma = c;
        reac.reaction_type = ReactionType::GasTwobody;
        reac
    }

    #[test]
    fn test_fnum() {
        assert_eq!(fnum(0.0), "0.0");
        assert_eq!(fnum(0.5), "0.5");
        assert_eq!(fnum(300.0), "300.0");
        assert_eq!(fnum(1.3e-9), "1.3e-9");
        assert_eq!(fnum(-200.0), "-200.0");
    }

    #[test]
    fn test_arrhenius_drops_unit_factors() {
        let reac = two_body(&["H2", "OH"], &["H2O", "H"], 1.0e-10, 0.0, 0.0);
        assert_eq!(reac.rate_expr(None).unwrap(), "1e-10");
        let reac = two_body(&["H2", "OH"], &["H2O", "H"], 1.0e-10, 0.5, 1000.0);
        assert_eq!(
            reac.rate_expr(None).unwrap(),
            "1e-10 * pow(Tgas/300.0, 0.5) * exp(-1000.0/Tgas)"
        );
        // negative barriers fold the sign instead of printing "--"
        let reac = two_body(&["H2", "OH"], &["H2O", "H"], 1.0e-10, 0.0, -200.0);
        assert_eq!(
            reac.rate_expr(None).unwrap(),
            "1e-10 * exp(200.0/Tgas)"
        );
    }

    #[test]
    fn test_equality_ignores_provenance_and_order() {
        let mut x = two_body(&["H2", "OH"], &["H2O", "H"], 1.0e-10, 0.0, 0.0);
        let mut y = two_body(&["OH", "H2"], &["H", "H2O"], 3.3e-11, 1.0, 50.0);
        y.format = Format::Kida;
        y.idxfromfile = 42;
        assert_eq!(x, y);
        x.temp_max = 100.0;
        assert_ne!(x, y);
    }

    #[test]
    fn test_contains_and_short() {
        let ctx = ChemContext::default();
        let reac = two_body(&["H2", "OH"], &["H2O", "H"], 1.0e-10, 0.0, 0.0);
        assert!(reac.contains(&Species::parse("OH", &ctx).unwrap()));
        assert!(reac.contains(&Species::parse("H2O", &ctx).unwrap()));
        assert!(!reac.contains(&Species::parse("CO", &ctx).unwrap()));
        assert_eq!(reac.short(), "H2 + OH -> H2O + H");
    }

    #[test]
    fn test_dedup_key_ignores_provenance() {
        let mut x = two_body(&["H2", "OH"], &["H2O", "H"], 1.0e-10, 0.0, 0.0);
        let mut y = two_body(&["OH", "H2"], &["H", "H2O"], 3.3e-11, 1.0, 50.0);
        y.format = Format::Kida;
        y.idxfromfile = 42;
        assert_eq!(x.dedup_key(), y.dedup_key());
        x.temp_max = 100.0;
        assert_ne!(x.dedup_key(), y.dedup_key());
    }

    #[test]
    fn test_unknown_type_matches_any() {
        let x = two_body(&["H2", "OH"], &["H2O", "H"], 1.0e-10, 0.0, 0.0);
        let mut y = x.clone();
        y.reaction_type = ReactionType::Unknown;
        assert_eq!(x, y);
    }

    #[test]
    fn test_grain_process_requires_model() {
        let ctx = ChemContext::default();
        let mut reac = Reaction::new(Format::Native);
        reac.reactants = vec![Species::parse("CO", &ctx).unwrap()];
        reac.products = vec![Species::parse("#CO", &ctx).unwrap()];
        reac.alpha = 1.0;
        reac.reaction_type = ReactionType::GrainFreeze;
        assert!(matches!(
            reac.rate_expr(None),
            Err(ChemNetError::GrainModelRequired(_))
        ));
    }
}
