//! Parser for the KIDA (KInetic Database for Astrochemistry) uo_* files.
//! Records are fixed width: a 34-character reactant block, a 56-character
//! product block, then whitespace-separated numeric fields. The "formula"
//! field selects the rate law and is mapped onto the canonical reaction
//! types; formulas outside 1..=6 fall back to the modified Arrhenius form
//! with a warning, following common practice for unvetted entries.
use super::{create_species, Format, Reaction, RecordParser};
use crate::error::ChemNetError;
use crate::reactiontype::ReactionType;
use crate::species::ChemContext;
use log::warn;

const REACTANT_WIDTH: usize = 34;
const PRODUCT_WIDTH: usize = 56;

#[derive(Debug, Clone, Copy, Default)]
pub struct KidaParser;

fn formula_to_type(formula: i32) -> ReactionType {
    match formula {
        1 => ReactionType::GasCosmicRay,
        2 => ReactionType::GasPhoton,
        3 => ReactionType::GasTwobody,
        4 => ReactionType::GasKidaIP1,
        5 => ReactionType::GasKidaIP2,
        6 => ReactionType::GasThreeBody,
        _ => ReactionType::Unknown,
    }
}

impl KidaParser {
    fn malformed(line: &str, reason: &str) -> ChemNetError {
        ChemNetError::RecordParse {
            format: "kida".to_string(),
            reason: reason.to_string(),
            record: line.to_string(),
        }
    }

    fn field<T: std::str::FromStr>(
        fields: &[&str],
        idx: usize,
        line: &str,
    ) -> Result<T, ChemNetError> {
        fields
            .get(idx)
            .and_then(|f| f.parse().ok())
            .ok_or_else(|| Self::malformed(line, &format!("bad numeric field {}", idx)))
    }
}

impl RecordParser for KidaParser {
    fn parse_line(
        &mut self,
        line: &str,
        ctx: &ChemContext,
    ) -> Result<Option<Reaction>, ChemNetError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            return Ok(None);
        }
        if line.len() < REACTANT_WIDTH + PRODUCT_WIDTH {
            return Err(Self::malformed(line, "record shorter than the species blocks"));
        }
        let (rpart, rest) = line.split_at(REACTANT_WIDTH);
        let (ppart, tail) = rest.split_at(PRODUCT_WIDTH);

        let mut reac = Reaction::new(Format::Kida);
        for token in rpart.split_whitespace() {
            if let Some(sp) = create_species(token, ctx)? {
                reac.reactants.push(sp);
            }
        }
        for token in ppart.split_whitespace() {
            if let Some(sp) = create_species(token, ctx)? {
                reac.products.push(sp);
            }
        }

        // a b c F g (uncert. type) itype Tlo Thi formula num (subnum) (recom)
        let fields: Vec<&str> = tail.split_whitespace().collect();
        if fields.len() < 11 {
            return Err(Self::malformed(line, "too few numeric fields"));
        }
        reac.alpha = Self::field(&fields, 0, line)?;
        reac.beta = Self::field(&fields, 1, line)?;
        reac.gamma = Self::field(&fields, 2, line)?;
        reac.temp_min = Self::field(&fields, 7, line)?;
        reac.temp_max = Self::field(&fields, 8, line)?;
        let formula: i32 = Self::field(&fields, 9, line)?;
        reac.idxfromfile = Self::field(&fields, 10, line)?;

        if !(1..=6).contains(&formula) {
            warn!(
                "formula {} is not valid in reaction \"{}\", falling back to formula 3",
                formula, trimmed
            );
            reac.reaction_type = ReactionType::GasTwobody;
        } else {
            reac.reaction_type = formula_to_type(formula);
        }

        Ok(Some(reac))
    }
}
