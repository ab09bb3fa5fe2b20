//! Parser for the Walsh et al. (2015) network tables (the Leeds format).
//! Records are fixed width; the trailing type field selects one of twenty
//! numbered rate laws, mapped here onto the canonical types. Surface
//! species carry a plain "G" prefix, and the CH2OHC radical is abbreviated
//! as "YC" in the tables.
use super::{create_species, Format, Reaction, RecordParser};
use crate::error::ChemNetError;
use crate::reactiontype::ReactionType;
use crate::species::ChemContext;

/// Field widths: idx, reactants, products, alpha, beta, gamma, Tlo, Thi, type.
const WIDTHS: [usize; 9] = [5, 30, 50, 8, 9, 10, 5, 5, 3];

#[derive(Debug, Clone, Default)]
pub struct LeedsParser {
    /// Context clone with the "G" surface prefix, built on first use.
    surface_ctx: Option<ChemContext>,
}

fn code_to_type(code: u32) -> Option<ReactionType> {
    use ReactionType::*;
    let t = match code {
        1 => GasTwobody,
        2 => GasCosmicRay,
        3 | 11 => GasUmistCRPhot,
        4 | 12 => GasPhoton,
        5 => GasLeedsXRay,
        6 => GrainRecombine,
        7 => GrainFreeze,
        8 => GrainDesorbThermal,
        9 => GrainDesorbCosmicRay,
        10 => GrainDesorbPhoton,
        13 => SurfaceDiffusion,
        14 => GrainDesorbReactive,
        // three-body and accompanying special entries carry no rate law
        15..=19 => Dummy,
        20 => GrainECapture,
        _ => return None,
    };
    Some(t)
}

impl LeedsParser {
    fn malformed(line: &str, reason: &str) -> ChemNetError {
        ChemNetError::RecordParse {
            format: "leeds".to_string(),
            reason: reason.to_string(),
            record: line.to_string(),
        }
    }
}

impl RecordParser for LeedsParser {
    fn parse_line(
        &mut self,
        line: &str,
        ctx: &ChemContext,
    ) -> Result<Option<Reaction>, ChemNetError> {
        let trimmed = line.trim_end();
        if trimmed.trim().is_empty() || trimmed.trim_start().starts_with('#') {
            return Ok(None);
        }
        let total: usize = WIDTHS.iter().sum();
        if trimmed.len() < total {
            return Err(Self::malformed(line, "record shorter than the fixed-width fields"));
        }

        let sctx = self.surface_ctx.get_or_insert_with(|| {
            let mut c = ctx.clone();
            c.surface_prefix = "G".to_string();
            c
        });

        let mut cuts = [0usize; 10];
        for (i, w) in WIDTHS.iter().enumerate() {
            cuts[i + 1] = cuts[i] + w;
        }
        let field = |i: usize| &trimmed[cuts[i]..cuts[i + 1]];

        let mut reac = Reaction::new(Format::Leeds);
        reac.idxfromfile = field(0)
            .trim()
            .parse()
            .map_err(|_| Self::malformed(line, "bad index field"))?;

        for token in field(1).split_whitespace() {
            let token = token.replace("YC", "CH2OHC");
            if let Some(sp) = create_species(&token, sctx)? {
                reac.reactants.push(sp);
            }
        }
        for token in field(2).split_whitespace() {
            let token = token.replace("YC", "CH2OHC");
            if let Some(sp) = create_species(&token, sctx)? {
                reac.products.push(sp);
            }
        }

        let numeric = |i: usize| -> Result<f64, ChemNetError> {
            field(i)
                .trim()
                .parse()
                .map_err(|_| Self::malformed(line, &format!("bad numeric field {}", i)))
        };
        reac.alpha = numeric(3)?;
        reac.beta = numeric(4)?;
        reac.gamma = numeric(5)?;
        reac.temp_min = numeric(6)?;
        reac.temp_max = numeric(7)?;

        // the first character of the type field is unused
        let code: u32 = field(8)[1..]
            .trim()
            .parse()
            .map_err(|_| Self::malformed(line, "bad type field"))?;
        reac.reaction_type = code_to_type(code).ok_or_else(|| ChemNetError::UnknownTypeCode {
            format: "leeds".to_string(),
            code: code.to_string(),
        })?;

        Ok(Some(reac))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grains::{GrainModel, Hh93Grain};
    use approx::assert_relative_eq;

    fn record(idx: &str, reac: &str, prod: &str, nums: [&str; 5], rtype: &str) -> String {
        // the type field is right-justified; its first character is unused
        format!(
            "{:<5}{:<30}{:<50}{:<8}{:<9}{:<10}{:<5}{:<5}{:>3}",
            idx, reac, prod, nums[0], nums[1], nums[2], nums[3], nums[4], rtype
        )
    }

    #[test]
    fn test_two_body_record() {
        let ctx = ChemContext::default();
        let line = record(
            "1",
            "H2 OH",
            "H2O H",
            ["2.05e-12", "1.52", "1736.0", "10", "2581"],
            "1",
        );
        let reac = LeedsParser::default()
            .parse_line(&line, &ctx)
            .unwrap()
            .unwrap();
        assert_eq!(reac.reaction_type, ReactionType::GasTwobody);
        assert_relative_eq!(reac.beta, 1.52);
        // LEEDS keeps the unit factors even for zero exponents
        let rate = reac.rate_expr(None).unwrap();
        assert!(rate.contains("pow(Tgas/300.0, 1.52)"));
    }

    #[test]
    fn test_surface_prefix_is_g() {
        let ctx = ChemContext::default();
        let line = record(
            "2",
            "GCO",
            "CO",
            ["1.0", "0.0", "28.0", "0", "9999"],
            "8",
        );
        let reac = LeedsParser::default()
            .parse_line(&line, &ctx)
            .unwrap()
            .unwrap();
        assert!(reac.reactants[0].is_surface);
        assert_eq!(reac.reactants[0].gasname, "CO");
        assert_eq!(reac.reaction_type, ReactionType::GrainDesorbThermal);
        let grain: GrainModel = Hh93Grain::default().into();
        assert!(reac.rate_expr(Some(&grain)).unwrap().contains("eb_GCOI"));
    }

    #[test]
    fn test_xray_and_stub_codes_rate_zero() {
        let ctx = ChemContext::default();
        for code in ["5", "15", "19"] {
            let line = record(
                "3",
                "He",
                "He+ E",
                ["1.0", "0.0", "0.0", "0", "9999"],
                code,
            );
            let reac = LeedsParser::default()
                .parse_line(&line, &ctx)
                .unwrap()
                .unwrap();
            assert_eq!(reac.rate_expr(None).unwrap(), "0.0");
        }
    }

    #[test]
    fn test_cosmic_ray_uses_split_ionization_rates() {
        let ctx = ChemContext::default();
        let line = record(
            "4",
            "H2",
            "H2+ E",
            ["0.93", "0.0", "0.0", "0", "9999"],
            "2",
        );
        let reac = LeedsParser::default()
            .parse_line(&line, &ctx)
            .unwrap()
            .unwrap();
        assert_eq!(
            reac.rate_expr(None).unwrap(),
            "0.93 * (zeta_cr + zeta_xr) / zism"
        );
    }

    #[test]
    fn test_unknown_code() {
        let ctx = ChemContext::default();
        let line = record("5", "H2", "H2", ["1.0", "0.0", "0.0", "0", "9999"], "99");
        assert!(matches!(
            LeedsParser::default().parse_line(&line, &ctx),
            Err(ChemNetError::UnknownTypeCode { .. })
        ));
    }
}
