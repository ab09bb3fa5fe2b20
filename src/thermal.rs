//! Heating and cooling processes. A thermal process is not a chemical
//! reaction: it leaves the abundances untouched and contributes only to the
//! gas temperature equation, proportional to the abundances of the species
//! that drive it. Rates are literal C expressions in `y[IDX_TGAS]`.
use crate::error::ChemNetError;
use crate::reactions::create_species;
use crate::species::{ChemContext, Species};

#[derive(Debug, Clone)]
pub struct ThermalProcess {
    reactants: Vec<Species>,
    rate: String,
}

impl ThermalProcess {
    /// Pseudo species among the reactants are dropped, as in reaction
    /// records.
    pub fn new(
        reactants: &[&str],
        rate: &str,
        ctx: &ChemContext,
    ) -> Result<ThermalProcess, ChemNetError> {
        let mut parsed = Vec::with_capacity(reactants.len());
        for token in reactants {
            if let Some(sp) = create_species(token, ctx)? {
                parsed.push(sp);
            }
        }
        Ok(ThermalProcess {
            reactants: parsed,
            rate: rate.to_string(),
        })
    }

    /// Species whose abundances the rate is proportional to, with
    /// multiplicity.
    pub fn reactants(&self) -> &[Species] {
        &self.reactants
    }

    pub fn rateexpr(&self) -> &str {
        &self.rate
    }
}

/// Cooling processes with a known rate law, keyed by a short label:
/// collisional ionization (CIC), recombination (RC) and collisional
/// excitation (CEC) cooling of hydrogen and helium, after Cen (1992).
/// Rates are in erg cm^3 s^-1.
pub fn supported_cooling(
    ctx: &ChemContext,
) -> Result<Vec<(String, ThermalProcess)>, ChemNetError> {
    let table: [(&str, &[&str], &str); 11] = [
        (
            "CIC_HI",
            &["H", "e-"],
            "1.27e-21 * sqrt(y[IDX_TGAS]) / (1.0 + sqrt(y[IDX_TGAS]/1e5)) * exp(-1.578091e5/y[IDX_TGAS])",
        ),
        (
            "CIC_HeI",
            &["He", "e-"],
            "9.38e-22 * sqrt(y[IDX_TGAS]) / (1.0 + sqrt(y[IDX_TGAS]/1e5)) * exp(-2.853354e5/y[IDX_TGAS])",
        ),
        (
            "CIC_HeII",
            &["He+", "e-"],
            "4.95e-22 * sqrt(y[IDX_TGAS]) / (1.0 + sqrt(y[IDX_TGAS]/1e5)) * exp(-6.31515e5/y[IDX_TGAS])",
        ),
        (
            "CIC_He_2S",
            &["He+", "e-", "e-"],
            "5.01e-27 * pow(y[IDX_TGAS], -0.1687) / (1.0 + sqrt(y[IDX_TGAS]/1e5)) * exp(-5.5338e4/y[IDX_TGAS])",
        ),
        (
            "RC_HII",
            &["H+", "e-"],
            "8.7e-27 * sqrt(y[IDX_TGAS]) * pow(y[IDX_TGAS]/1e3, -0.2) / (1.0+pow(y[IDX_TGAS]/1e6, 0.7))",
        ),
        // dielectronic recombination
        (
            "RC_HeI",
            &["He+", "e-"],
            "1.24e-13 * pow(y[IDX_TGAS], -1.5) * exp(-4.7e5/y[IDX_TGAS]) * (1.0+0.3*exp(-9.4e4/y[IDX_TGAS]))",
        ),
        (
            "RC_HeII",
            &["He+", "e-"],
            "1.55e-26 * pow(y[IDX_TGAS], 0.3647)",
        ),
        (
            "RC_HeIII",
            &["He++", "e-"],
            "3.48e-26 * sqrt(y[IDX_TGAS]) * pow(y[IDX_TGAS]/1e3, -0.2) / (1.0+pow(y[IDX_TGAS]/1e6, 0.7))",
        ),
        (
            "CEC_HI",
            &["H", "e-", "e-"],
            "9.1e-27 * pow(y[IDX_TGAS], -0.1687) / (1.0+sqrt(y[IDX_TGAS]/1e5)) * exp(-1.3179e4/y[IDX_TGAS])",
        ),
        (
            "CEC_HeI",
            &["He+", "e-"],
            "5.54e-17 * pow(y[IDX_TGAS], -.0397) / (1.0+sqrt(y[IDX_TGAS]/1e5)) * exp(-4.73638e5/y[IDX_TGAS])",
        ),
        (
            "CEC_HeII",
            &["He+", "e-"],
            "5.54e-17 * pow(y[IDX_TGAS], -.0397) / (1.0+sqrt(y[IDX_TGAS]/1e5)) * exp(-4.73638e5/y[IDX_TGAS])",
        ),
    ];
    table
        .iter()
        .map(|(name, reactants, rate)| {
            ThermalProcess::new(reactants, rate, ctx).map(|p| (name.to_string(), p))
        })
        .collect()
}

/// Heating counterpart of [`supported_cooling`]; no heating process
/// carries a rate law.
pub fn supported_heating(
    _ctx: &ChemContext,
) -> Result<Vec<(String, ThermalProcess)>, ChemNetError> {
    Ok(Vec::new())
}

fn allowed(
    table: Vec<(String, ThermalProcess)>,
    species: &[Species],
) -> Vec<(String, ThermalProcess)> {
    table
        .into_iter()
        .filter(|(_, p)| p.reactants.iter().all(|r| species.contains(r)))
        .collect()
}

/// The supported cooling processes whose reactants all appear in the given
/// species list.
pub fn allowed_cooling(
    species: &[Species],
    ctx: &ChemContext,
) -> Result<Vec<(String, ThermalProcess)>, ChemNetError> {
    Ok(allowed(supported_cooling(ctx)?, species))
}

/// The supported heating processes whose reactants all appear in the given
/// species list.
pub fn allowed_heating(
    species: &[Species],
    ctx: &ChemContext,
) -> Result<Vec<(String, ThermalProcess)>, ChemNetError> {
    Ok(allowed(supported_heating(ctx)?, species))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ChemContext {
        ChemContext::default()
    }

    #[test]
    fn test_supported_cooling_table() {
        let table = supported_cooling(&ctx()).unwrap();
        assert_eq!(table.len(), 11);
        assert!(table.iter().all(|(_, p)| p.rateexpr().contains("y[IDX_TGAS]")));
        assert!(table.iter().all(|(_, p)| !p.reactants().is_empty()));
    }

    #[test]
    fn test_allowed_cooling_requires_every_reactant() {
        let ctx = ctx();
        // "E" spells the electron too
        let species = vec![
            Species::parse("He+", &ctx).unwrap(),
            Species::parse("E", &ctx).unwrap(),
        ];
        let names: Vec<String> = allowed_cooling(&species, &ctx)
            .unwrap()
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(
            names,
            vec!["CIC_HeII", "CIC_He_2S", "RC_HeI", "RC_HeII", "CEC_HeI", "CEC_HeII"]
        );
        assert!(allowed_heating(&species, &ctx).unwrap().is_empty());
    }
}
