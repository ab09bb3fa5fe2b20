//! Symbolic assembly of the chemical ODE system. Given a network snapshot
//! this produces the C fragments an external solver template consumes: the
//! temperature-gated rate assignments `k[i] = ...`, the per-species right
//! hand side `ydot[IDX_x] = ...` and the Jacobian, dense or compressed
//! sparse row. Attached heating or cooling processes add a gas temperature
//! equation as the last row. The assembler holds no state of its own;
//! rebuild it after any edit to the network.
use crate::error::ChemNetError;
use crate::grains::GrainModel;
use crate::network::Network;
use crate::reactions::fnum;
use crate::thermal::ThermalProcess;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize)]
pub struct OdeSystem {
    pub n_spec: usize,
    /// Number of equations: `n_spec`, plus one when a temperature equation
    /// is attached.
    pub n_eqns: usize,
    /// `y[IDX_<alias>]` in species order, `y[IDX_TGAS]` appended when the
    /// system carries a temperature equation.
    pub symbols: Vec<String>,
    /// One `k[i] = ...;` assignment per reaction, wrapped in the reaction's
    /// temperature window where the database declares one.
    pub rate_eqns: Vec<String>,
    /// One `kh[i] = ...;` / `kc[i] = ...;` assignment per thermal process.
    pub heating_rate_eqns: Vec<String>,
    pub cooling_rate_eqns: Vec<String>,
    /// One `ydot[...] = ...;` statement per equation.
    pub fex: Vec<String>,
    /// Dense row-major Jacobian entries, `"0.0"` where no reaction
    /// contributes.
    pub jac: Vec<String>,
}

/// CSR-style view over the non-zero Jacobian entries.
#[derive(Debug, Clone, Serialize)]
pub struct SparseJacobian {
    pub nrow: usize,
    pub nnz: usize,
    pub row_ptr: Vec<usize>,
    pub col_idx: Vec<usize>,
    pub data: Vec<String>,
}

impl OdeSystem {
    pub fn assemble(
        network: &Network,
        grain: Option<&GrainModel>,
    ) -> Result<OdeSystem, ChemNetError> {
        OdeSystem::assemble_with_thermal(network, grain, &[], &[])
    }

    /// Like [`OdeSystem::assemble`], with heating and cooling processes
    /// attached. Any thermal process adds a temperature equation as the
    /// last row: dT/dt collects the heating terms minus the cooling terms,
    /// scaled by (gamma - 1) / kerg / npar, and only the last Jacobian row
    /// gains the corresponding derivatives.
    pub fn assemble_with_thermal(
        network: &Network,
        grain: Option<&GrainModel>,
        heating: &[ThermalProcess],
        cooling: &[ThermalProcess],
    ) -> Result<OdeSystem, ChemNetError> {
        let species = network.species();
        let n_spec = species.len();
        let has_thermal = !heating.is_empty() || !cooling.is_empty();
        let n_eqns = n_spec + usize::from(has_thermal);
        let mut symbols: Vec<String> = species
            .iter()
            .map(|s| format!("y[IDX_{}]", s.alias))
            .collect();
        if has_thermal {
            symbols.push("y[IDX_TGAS]".to_string());
        }
        // key electrons under one spelling, matching Species equality
        let key = |s: &crate::species::Species| {
            if s.is_electron() {
                "e-".to_string()
            } else {
                s.name.clone()
            }
        };
        let index: HashMap<String, usize> = species
            .iter()
            .enumerate()
            .map(|(i, s)| (key(s), i))
            .collect();
        let spec_index = |s: &crate::species::Species| {
            index.get(&key(s)).copied().ok_or_else(|| {
                ChemNetError::RateExpression(format!("unknown species {}", s.name))
            })
        };

        let mut rate_eqns = Vec::with_capacity(network.n_reactions());
        let mut rhs = vec!["0.0".to_string(); n_eqns];
        let mut jac = vec!["0.0".to_string(); n_eqns * n_eqns];

        for (rl, reac) in network.reactions().iter().enumerate() {
            let expr = reac.rate_expr(grain)?;
            let lo = (reac.temp_min > 0.0).then(|| format!("Tgas>={}", fnum(reac.temp_min)));
            let hi = (reac.temp_max > 0.0).then(|| format!("Tgas<{}", fnum(reac.temp_max)));
            let guard = match (lo, hi) {
                (Some(lo), Some(hi)) => Some(format!("{} && {}", lo, hi)),
                (Some(one), None) | (None, Some(one)) => Some(one),
                (None, None) => None,
            };
            rate_eqns.push(match guard {
                Some(guard) => format!("if ({}) {{\nk[{}] = {};\n}}", guard, rl, expr),
                None => format!("k[{}] = {};", rl, expr),
            });

            let mut ridx = Vec::with_capacity(reac.reactants.len());
            for sp in &reac.reactants {
                ridx.push(spec_index(sp)?);
            }
            let mut pidx = Vec::with_capacity(reac.products.len());
            for sp in &reac.products {
                pidx.push(spec_index(sp)?);
            }

            let rsym: Vec<&str> = ridx.iter().map(|&i| symbols[i].as_str()).collect();
            let monomial: String = rsym
                .iter()
                .fold(format!("k[{}]", rl), |acc, s| format!("{}*{}", acc, s));
            // repeated reactants contribute one term per occurrence
            for &si in &ridx {
                rhs[si].push_str(&format!(" - {}", monomial));
            }
            for &si in &pidx {
                rhs[si].push_str(&format!(" + {}", monomial));
            }

            // d(term)/dy[ri]: the monomial with one factor of ri removed
            let partial = |ri: usize| {
                let mut rest: Vec<&str> = rsym.clone();
                if let Some(pos) = rest.iter().position(|s| *s == symbols[ri]) {
                    rest.remove(pos);
                }
                rest.iter()
                    .fold(format!("k[{}]", rl), |acc, s| format!("{}*{}", acc, s))
            };
            for &si in &ridx {
                for &ri in &ridx {
                    jac[si * n_eqns + ri].push_str(&format!(" - {}", partial(ri)));
                }
            }
            for &si in &pidx {
                for &ri in &ridx {
                    jac[si * n_eqns + ri].push_str(&format!(" + {}", partial(ri)));
                }
            }
        }

        // thermal terms land in the temperature row only
        let mut heating_rate_eqns = Vec::with_capacity(heating.len());
        for (hl, process) in heating.iter().enumerate() {
            heating_rate_eqns.push(format!("kh[{}] = {};", hl, process.rateexpr()));
            let mut ridx = Vec::with_capacity(process.reactants().len());
            for sp in process.reactants() {
                ridx.push(spec_index(sp)?);
            }
            let rsym: Vec<&str> = ridx.iter().map(|&i| symbols[i].as_str()).collect();
            rhs[n_spec].push_str(&format!(" + kh[{}] * {}", hl, rsym.join("*")));
            for &ri in &ridx {
                let mut rest = rsym.clone();
                if let Some(pos) = rest.iter().position(|s| *s == symbols[ri]) {
                    rest.remove(pos);
                }
                let term = rest
                    .iter()
                    .fold(format!("kh[{}]", hl), |acc, s| format!("{}*{}", acc, s));
                jac[n_spec * n_eqns + ri].push_str(&format!(" + {}", term));
            }
        }
        let mut cooling_rate_eqns = Vec::with_capacity(cooling.len());
        for (cl, process) in cooling.iter().enumerate() {
            cooling_rate_eqns.push(format!("kc[{}] = {};", cl, process.rateexpr()));
            let mut ridx = Vec::with_capacity(process.reactants().len());
            for sp in process.reactants() {
                ridx.push(spec_index(sp)?);
            }
            let rsym: Vec<&str> = ridx.iter().map(|&i| symbols[i].as_str()).collect();
            rhs[n_spec].push_str(&format!(" - kc[{}] * {}", cl, rsym.join("*")));
            for &ri in &ridx {
                let mut rest = rsym.clone();
                if let Some(pos) = rest.iter().position(|s| *s == symbols[ri]) {
                    rest.remove(pos);
                }
                let term = rest
                    .iter()
                    .fold(format!("kc[{}]", cl), |acc, s| format!("{}*{}", acc, s));
                jac[n_spec * n_eqns + ri].push_str(&format!(" - {}", term));
            }
        }
        if has_thermal {
            // energy balance: dT/dt = (gamma - 1) sum(heating - cooling) / (k_B n)
            rhs[n_spec] = format!("(gamma - 1.0) * ( {} ) / kerg / npar", rhs[n_spec]);
            for si in 0..n_spec {
                let entry = &mut jac[n_spec * n_eqns + si];
                if *entry != "0.0" {
                    *entry = format!("(gamma - 1.0) * ( {} ) / kerg / npar", entry);
                }
            }
        }

        let mut fex: Vec<String> = species
            .iter()
            .zip(&rhs)
            .map(|(sp, acc)| format!("ydot[IDX_{}] = {};", sp.alias, acc))
            .collect();
        if has_thermal {
            fex.push(format!("ydot[IDX_TGAS] = {};", rhs[n_spec]));
        }

        Ok(OdeSystem {
            n_spec,
            n_eqns,
            symbols,
            rate_eqns,
            heating_rate_eqns,
            cooling_rate_eqns,
            fex,
            jac,
        })
    }

    /// Jacobian rows in CSR form, skipping entries that stayed `"0.0"`.
    pub fn sparse_jacobian(&self) -> SparseJacobian {
        let mut row_ptr = Vec::with_capacity(self.n_eqns + 1);
        let mut col_idx = Vec::new();
        let mut data = Vec::new();
        let mut nnz = 0;
        for row in 0..self.n_eqns {
            row_ptr.push(nnz);
            for col in 0..self.n_eqns {
                let entry = &self.jac[row * self.n_eqns + col];
                if entry != "0.0" {
                    nnz += 1;
                    col_idx.push(col);
                    data.push(entry.clone());
                }
            }
        }
        row_ptr.push(nnz);
        SparseJacobian {
            nrow: self.n_eqns,
            nnz,
            row_ptr,
            col_idx,
            data,
        }
    }
}
