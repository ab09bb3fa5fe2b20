//! Parser for UCLCHEM Makerates output (comma-separated). The second
//! reactant slot may hold a process keyword (CRP, PHOTON, FREEZE, ...)
//! instead of a species; the keyword selects the reaction type and is
//! dropped from the species lists. Freeze-out entries are clamped to the
//! 0-30 K window where UCLCHEM applies them.
use super::{create_species, Format, Reaction, RecordParser};
use crate::error::ChemNetError;
use crate::reactiontype::ReactionType;
use crate::species::ChemContext;

/// keyword -> reaction type; records without a keyword are two-body
/// gas-phase collisions.
const KEYWORD_TABLE: &[(&str, ReactionType)] = &[
    ("CRP", ReactionType::GasCosmicRay),
    ("PHOTON", ReactionType::GasPhoton),
    ("CRPHOT", ReactionType::GasUmistCRPhot),
    ("FREEZE", ReactionType::GrainFreeze),
    ("DESOH2", ReactionType::GrainDesorbH2),
    ("DESCR", ReactionType::GrainDesorbCosmicRay),
    ("DEUVCR", ReactionType::GrainDesorbPhoton),
    ("THERM", ReactionType::GrainDesorbThermal),
    ("DIFF", ReactionType::SurfaceDiffusion),
    ("CHEMDES", ReactionType::GrainDesorbReactive),
];

/// Keywords that must not be parsed as species.
const KEYWORDS: &[&str] = &[
    "NAN", "FREEZE", "DESOH2", "DESCR", "DEUVCR", "THERM", "DIFF", "CHEMDES",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct UclchemParser;

impl UclchemParser {
    fn malformed(line: &str, reason: &str) -> ChemNetError {
        ChemNetError::RecordParse {
            format: "uclchem".to_string(),
            reason: reason.to_string(),
            record: line.to_string(),
        }
    }
}

impl RecordParser for UclchemParser {
    fn parse_line(
        &mut self,
        line: &str,
        ctx: &ChemContext,
    ) -> Result<Option<Reaction>, ChemNetError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            return Ok(None);
        }
        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if fields.len() < 12 {
            return Err(Self::malformed(line, "expected 7 species slots and 5 numeric fields"));
        }
        let (rpspec, tail) = fields.split_at(fields.len() - 5);

        let mut reac = Reaction::new(Format::Uclchem);
        reac.reaction_type = KEYWORD_TABLE
            .iter()
            .find(|(kw, _)| *kw == rpspec[1])
            .map(|(_, t)| *t)
            .unwrap_or(ReactionType::GasTwobody);

        let numeric = |idx: usize| -> Result<f64, ChemNetError> {
            tail[idx]
                .parse()
                .map_err(|_| Self::malformed(line, &format!("bad numeric field {}", idx)))
        };
        reac.alpha = numeric(0)?;
        reac.beta = numeric(1)?;
        reac.gamma = numeric(2)?;
        if reac.reaction_type == ReactionType::GrainFreeze {
            // UCLCHEM turns freeze-out off beyond 30 K
            reac.temp_min = 0.0;
            reac.temp_max = 30.0;
        } else {
            reac.temp_min = numeric(3)?;
            reac.temp_max = numeric(4)?;
        }

        for token in rpspec.iter().take(3) {
            if KEYWORDS.contains(token) {
                continue;
            }
            if let Some(sp) = create_species(token, ctx)? {
                reac.reactants.push(sp);
            }
        }
        for token in rpspec.iter().skip(3) {
            if KEYWORDS.contains(token) {
                continue;
            }
            if let Some(sp) = create_species(token, ctx)? {
                reac.products.push(sp);
            }
        }

        Ok(Some(reac))
    }
}
