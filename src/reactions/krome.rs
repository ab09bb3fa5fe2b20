//! Parser for KROME network files. The file itself redefines its record
//! layout through @format: directives, so the parser is stateful and must
//! live for exactly one file. Rate expressions are kept verbatim (with the
//! Fortran double-precision exponent normalized) and are translated to C
//! by [`super::converter`] when the rate is rendered.
use super::{create_species, Format, Reaction, RecordParser};
use crate::error::ChemNetError;
use crate::species::ChemContext;
use regex::Regex;

const DEFAULT_FORMAT: &str = "idx,r,r,r,p,p,p,p,tmin,tmax,rate";

/// Placeholders KROME uses for an unconstrained temperature bound.
const NO_LIMIT: &[&str] = &["N", "NONE", "N/A", "NO", ""];

#[derive(Debug, Clone)]
pub struct KromeParser {
    layout: Vec<String>,
    /// Names collected from @var: and @common: directives.
    pub variables: Vec<String>,
    pub commons: Vec<String>,
    /// Fortran double-precision exponent, e.g. "3.14d-13".
    dexp: Regex,
}

impl Default for KromeParser {
    fn default() -> Self {
        KromeParser {
            layout: DEFAULT_FORMAT.split(',').map(str::to_string).collect(),
            variables: Vec::new(),
            commons: Vec::new(),
            dexp: Regex::new(r"(\d\.?)[dD](\-?\d)").unwrap(),
        }
    }
}

impl KromeParser {
    fn parse_bound(value: &str, line: &str) -> Result<Option<f64>, ChemNetError> {
        let mut value = value.trim().to_string();
        if NO_LIMIT.contains(&value.to_uppercase().as_str()) {
            return Ok(None);
        }
        for op in ["<", ">", ".LE.", ".GE.", ".LT.", ".GT."] {
            value = value.replace(op, "");
        }
        let value = value.replace('d', "e").replace('D', "e");
        value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ChemNetError::RecordParse {
                format: "krome".to_string(),
                reason: "bad temperature bound".to_string(),
                record: line.to_string(),
            })
    }
}

impl RecordParser for KromeParser {
    fn parse_line(
        &mut self,
        line: &str,
        ctx: &ChemContext,
    ) -> Result<Option<Reaction>, ChemNetError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            return Ok(None);
        }
        if let Some(fmt) = trimmed.strip_prefix("@format:") {
            self.layout = fmt.to_lowercase().split(',').map(str::to_string).collect();
            return Ok(None);
        }
        if let Some(vars) = trimmed.strip_prefix("@var:") {
            self.variables
                .extend(vars.split(',').map(|v| v.trim().to_string()));
            return Ok(None);
        }
        if let Some(commons) = trimmed.strip_prefix("@common:") {
            self.commons
                .extend(commons.split(',').map(|c| c.trim().to_string()));
            return Ok(None);
        }
        if trimmed.starts_with('@') {
            // other directives (@noTabNext, ...) do not affect the records
            return Ok(None);
        }

        let mut reac = Reaction::new(Format::Krome);
        let values: Vec<&str> = trimmed.split(',').collect();
        for (pos, (key, value)) in self.layout.iter().zip(values.iter()).enumerate() {
            let key = key.as_str();
            if value.trim().is_empty() && key != "rate" {
                continue;
            }
            match key {
                "idx" => {
                    reac.idxfromfile = value.trim().parse().map_err(|_| {
                        ChemNetError::RecordParse {
                            format: "krome".to_string(),
                            reason: "bad index field".to_string(),
                            record: line.to_string(),
                        }
                    })?;
                }
                "r" => {
                    if let Some(sp) = create_species(value, ctx)? {
                        reac.reactants.push(sp);
                    }
                }
                "p" => {
                    if let Some(sp) = create_species(value, ctx)? {
                        reac.products.push(sp);
                    }
                }
                "tmin" => {
                    if let Some(t) = Self::parse_bound(value, line)? {
                        reac.temp_min = t;
                    }
                }
                "tmax" => {
                    if let Some(t) = Self::parse_bound(value, line)? {
                        reac.temp_max = t;
                    }
                }
                "rate" => {
                    // the rate is the last field; rejoin in case the
                    // expression itself contains commas (function calls)
                    let raw = values[pos..].join(",");
                    let raw = self.dexp.replace_all(&raw, "${1}e${2}").to_string();
                    reac.rate_string = Some(raw.replace("dexp", "exp").trim().to_string());
                }
                _ => {}
            }
        }

        Ok(Some(reac))
    }
}
