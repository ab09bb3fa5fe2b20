//! Parser for the crate's own comma-separated exchange format:
//! `idx, r1, r2, r3, p1..p5, alpha, beta, gamma, Tlo, Thi, type, source`.
//! The type column carries the numeric [`ReactionType`] code and the source
//! column names the database format the record was originally imported from.
use super::{create_species, Format, Reaction, RecordParser};
use crate::error::ChemNetError;
use crate::reactiontype::ReactionType;
use crate::species::ChemContext;

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeParser;

impl NativeParser {
    fn malformed(line: &str, reason: &str) -> ChemNetError {
        ChemNetError::RecordParse {
            format: "native".to_string(),
            reason: reason.to_string(),
            record: line.to_string(),
        }
    }
}

impl RecordParser for NativeParser {
    fn parse_line(
        &mut self,
        line: &str,
        ctx: &ChemContext,
    ) -> Result<Option<Reaction>, ChemNetError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        let fields: Vec<&str> = trimmed.split(',').collect();
        if fields.len() != 16 {
            return Err(Self::malformed(line, "expected 16 comma-separated fields"));
        }

        let source = fields[15].trim();
        let format = source.parse().unwrap_or(Format::Native);
        let mut reac = Reaction::new(format);
        reac.idxfromfile = fields[0]
            .trim()
            .parse()
            .map_err(|_| Self::malformed(line, "bad index field"))?;

        for token in &fields[1..4] {
            if let Some(sp) = create_species(token, ctx)? {
                reac.reactants.push(sp);
            }
        }
        for token in &fields[4..9] {
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

        let code: u32 = fields[14]
            .trim()
            .parse()
            .map_err(|_| Self::malformed(line, "bad type code field"))?;
        reac.reaction_type =
            ReactionType::from_code(code).ok_or_else(|| ChemNetError::UnknownTypeCode {
                format: "native".to_string(),
                code: code.to_string(),
            })?;

        Ok(Some(reac))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const RECORD: &str = "7    ,           H,          OH,            ,\
         H2O,            ,            ,            ,            ,\
 4.000e-18, 5.000e-01, 0.000e+00,    10.00,   280.00, 100,    umist";

    #[test]
    fn test_round_trip_record() {
        let ctx = ChemContext::default();
        let reac = NativeParser.parse_line(RECORD, &ctx).unwrap().unwrap();
        assert_eq!(reac.idxfromfile, 7);
        assert_eq!(reac.reactants.len(), 2);
        assert_eq!(reac.products.len(), 1);
        assert_relative_eq!(reac.alpha, 4.0e-18);
        assert_relative_eq!(reac.beta, 0.5);
        assert_relative_eq!(reac.temp_min, 10.0);
        assert_eq!(reac.reaction_type, ReactionType::GasTwobody);
        // the source column restores the originating format
        assert_eq!(reac.format, Format::Umist);
    }

    #[test]
    fn test_unknown_source_falls_back_to_native() {
        let ctx = ChemContext::default();
        let line = RECORD.replace("umist", "mystery");
        let reac = NativeParser.parse_line(&line, &ctx).unwrap().unwrap();
        assert_eq!(reac.format, Format::Native);
    }

    #[test]
    fn test_field_count_check() {
        let ctx = ChemContext::default();
        assert!(matches!(
            NativeParser.parse_line("1,H,OH,H2O", &ctx),
            Err(ChemNetError::RecordParse { .. })
        ));
    }

    #[test]
    fn test_bad_type_code() {
        let ctx = ChemContext::default();
        let line = RECORD.replace(" 100,", " 123,");
        assert!(matches!(
            NativeParser.parse_line(&line, &ctx),
            Err(ChemNetError::UnknownTypeCode { .. })
        ));
    }
}
