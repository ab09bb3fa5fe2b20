//! Parser for UMIST / RATE12 colon-delimited records. The two-letter code
//! field carries the process category (see McElroy et al. 2013); every
//! category is a two-body collision except the cosmic-ray, cosmic-ray
//! photon and photoprocess entries.
use super::{create_species, Format, Reaction, RecordParser};
use crate::error::ChemNetError;
use crate::reactiontype::ReactionType;
use crate::species::ChemContext;

/// code -> canonical type; the many two-body subcategories (AD, CD, CE,
/// DR, IN, MN, NN, RA, REA, RR) all share the Arrhenius law.
const CODE_TABLE: &[(&str, ReactionType)] = &[
    ("AD", ReactionType::GasTwobody),
    ("CD", ReactionType::GasTwobody),
    ("CE", ReactionType::GasTwobody),
    ("CP", ReactionType::GasCosmicRay),
    ("CR", ReactionType::GasUmistCRPhot),
    ("DR", ReactionType::GasTwobody),
    ("IN", ReactionType::GasTwobody),
    ("MN", ReactionType::GasTwobody),
    ("NN", ReactionType::GasTwobody),
    ("PH", ReactionType::GasPhoton),
    ("RA", ReactionType::GasTwobody),
    ("REA", ReactionType::GasTwobody),
    ("RR", ReactionType::GasTwobody),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct UmistParser;

impl UmistParser {
    fn malformed(line: &str, reason: &str) -> ChemNetError {
        ChemNetError::RecordParse {
            format: "umist".to_string(),
            reason: reason.to_string(),
            record: line.to_string(),
        }
    }
}

impl RecordParser for UmistParser {
    fn parse_line(
        &mut self,
        line: &str,
        ctx: &ChemContext,
    ) -> Result<Option<Reaction>, ChemNetError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            return Ok(None);
        }
        // idx:code:R1:R2:P1:P2:P3:P4:ref:a:b:c:Tlo:Thi:...
        let fields: Vec<&str> = trimmed.split(':').collect();
        if fields.len() < 14 {
            return Err(Self::malformed(line, "expected at least 14 colon-separated fields"));
        }

        let mut reac = Reaction::new(Format::Umist);
        reac.idxfromfile = fields[0]
            .trim()
            .parse()
            .map_err(|_| Self::malformed(line, "bad index field"))?;
        let code = fields[1].trim();
        reac.reaction_type = CODE_TABLE
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, t)| *t)
            .ok_or_else(|| ChemNetError::UnknownTypeCode {
                format: "umist".to_string(),
                code: code.to_string(),
            })?;

        for token in &fields[2..4] {
            if let Some(sp) = create_species(token, ctx)? {
                reac.reactants.push(sp);
            }
        }
        for token in &fields[4..8] {
            if let Some(sp) = create_species(token, ctx)? {
                reac.products.push(sp);
            }
        }

        let numeric = |idx: usize| -> Result<f64, ChemNetError> {
            fields[idx]
                .trim()
                .parse()
                .map_err(|_| Self::malformed(line, &format!("bad numeric field {}", idx)))
        };
        reac.alpha = numeric(9)?;
        reac.beta = numeric(10)?;
        reac.gamma = numeric(11)?;
        reac.temp_min = numeric(12)?;
        reac.temp_max = numeric(13)?;

        Ok(Some(reac))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const NN_RECORD: &str =
        "1:NN:H2:OH:H2O:H::::1:2.05e-12:1.52:1736:250:2581:::M:";
    const CP_RECORD: &str = "5:CP:H2:::H2+:e-:::1:9.3e-01:0:0:10:41000:::M:";

    #[test]
    fn test_two_body_record() {
        let ctx = ChemContext::default();
        let reac = UmistParser.parse_line(NN_RECORD, &ctx).unwrap().unwrap();
        assert_eq!(reac.idxfromfile, 1);
        assert_eq!(reac.reaction_type, ReactionType::GasTwobody);
        assert_eq!(reac.reactants.len(), 2);
        assert_eq!(reac.products.len(), 2);
        assert_relative_eq!(reac.alpha, 2.05e-12);
        assert_relative_eq!(reac.temp_max, 2581.0);
        let rate = reac.rate_expr(None).unwrap();
        assert!(rate.contains("pow(Tgas/300.0, 1.52)"));
        assert!(rate.contains("exp(-1736.0/Tgas)"));
    }

    #[test]
    fn test_cosmic_ray_proton_rate_is_plain_alpha() {
        let ctx = ChemContext::default();
        let reac = UmistParser.parse_line(CP_RECORD, &ctx).unwrap().unwrap();
        assert_eq!(reac.reaction_type, ReactionType::GasCosmicRay);
        assert_eq!(reac.rate_expr(None).unwrap(), "0.93");
    }

    #[test]
    fn test_unknown_code() {
        let ctx = ChemContext::default();
        let bad = "9:ZZ:H2:OH:H2O:H::::1:1e-10:0:0:10:300:::M:";
        assert!(matches!(
            UmistParser.parse_line(bad, &ctx),
            Err(ChemNetError::UnknownTypeCode { .. })
        ));
    }
}
