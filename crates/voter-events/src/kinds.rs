//! Kind Selections
//!
//! Enumerated simulation, interaction and network kinds with the short codes
//! used on the command line and in output records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How agent state is held while a model runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimulationKind {
    /// Dense per-index state vectors
    #[serde(rename = "matrix")]
    Matrix,
    /// One stateful entity per agent
    #[serde(rename = "abm")]
    Agent,
}

impl SimulationKind {
    /// Short code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            SimulationKind::Matrix => "matrix",
            SimulationKind::Agent => "abm",
        }
    }

    pub fn all() -> &'static [SimulationKind] {
        &[SimulationKind::Matrix, SimulationKind::Agent]
    }
}

impl FromStr for SimulationKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "matrix" => Ok(SimulationKind::Matrix),
            "abm" | "agent" => Ok(SimulationKind::Agent),
            _ => Err(ParseKindError::Simulation(s.to_string())),
        }
    }
}

impl fmt::Display for SimulationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Shape of the interaction that drives opinion updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionKind {
    /// Pairwise, neighbor-based majority
    #[serde(rename = "dy")]
    Dyadic,
    /// Group decisions over sampled partitions
    #[serde(rename = "ho")]
    HigherOrder,
}

impl InteractionKind {
    /// Short code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            InteractionKind::Dyadic => "dy",
            InteractionKind::HigherOrder => "ho",
        }
    }

    pub fn all() -> &'static [InteractionKind] {
        &[InteractionKind::Dyadic, InteractionKind::HigherOrder]
    }
}

impl FromStr for InteractionKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dy" | "dyadic" => Ok(InteractionKind::Dyadic),
            "ho" | "hord" | "higher_order" => Ok(InteractionKind::HigherOrder),
            _ => Err(ParseKindError::Interaction(s.to_string())),
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Network families the ensemble factory can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkKind {
    #[serde(rename = "l2dr")]
    Lattice2dRectangle,
    #[serde(rename = "l2dt")]
    Lattice2dTriangle,
    #[serde(rename = "l2dh")]
    Lattice2dHexagon,
    #[serde(rename = "k_n")]
    Complete,
    #[serde(rename = "ws")]
    WattsStrogatz,
    #[serde(rename = "pl")]
    PowerLaw,
    #[serde(rename = "hc")]
    Hypercube,
    #[serde(rename = "er")]
    ErdosRenyi,
    #[serde(rename = "ba")]
    BarabasiAlbert,
}

impl NetworkKind {
    /// Short code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            NetworkKind::Lattice2dRectangle => "l2dr",
            NetworkKind::Lattice2dTriangle => "l2dt",
            NetworkKind::Lattice2dHexagon => "l2dh",
            NetworkKind::Complete => "k_n",
            NetworkKind::WattsStrogatz => "ws",
            NetworkKind::PowerLaw => "pl",
            NetworkKind::Hypercube => "hc",
            NetworkKind::ErdosRenyi => "er",
            NetworkKind::BarabasiAlbert => "ba",
        }
    }

    /// Whether separate draws of this kind differ structurally.
    ///
    /// Non-variate kinds produce the same graph every time; an ensemble of
    /// them only varies through the initial opinions.
    pub fn is_variate(&self) -> bool {
        matches!(
            self,
            NetworkKind::WattsStrogatz
                | NetworkKind::PowerLaw
                | NetworkKind::ErdosRenyi
                | NetworkKind::BarabasiAlbert
        )
    }

    pub fn all() -> &'static [NetworkKind] {
        &[
            NetworkKind::Lattice2dRectangle,
            NetworkKind::Lattice2dTriangle,
            NetworkKind::Lattice2dHexagon,
            NetworkKind::Complete,
            NetworkKind::WattsStrogatz,
            NetworkKind::PowerLaw,
            NetworkKind::Hypercube,
            NetworkKind::ErdosRenyi,
            NetworkKind::BarabasiAlbert,
        ]
    }
}

impl FromStr for NetworkKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        NetworkKind::all()
            .iter()
            .copied()
            .find(|kind| kind.code() == code)
            .ok_or_else(|| ParseKindError::Network(s.to_string()))
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error for an unrecognized kind code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseKindError {
    Simulation(String),
    Interaction(String),
    Network(String),
}

impl fmt::Display for ParseKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseKindError::Simulation(s) => {
                write!(f, "unknown simulation kind: '{}', expected 'matrix' or 'abm'", s)
            }
            ParseKindError::Interaction(s) => {
                write!(f, "unknown interaction kind: '{}', expected 'dy' or 'ho'", s)
            }
            ParseKindError::Network(s) => write!(f, "unknown network kind: '{}'", s),
        }
    }
}

impl std::error::Error for ParseKindError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_codes_parse() {
        for kind in NetworkKind::all() {
            assert_eq!(kind.code().parse::<NetworkKind>().unwrap(), *kind);
        }
        assert_eq!("K_N".parse::<NetworkKind>().unwrap(), NetworkKind::Complete);
    }

    #[test]
    fn test_unknown_network_code() {
        let err = "torus".parse::<NetworkKind>().unwrap_err();
        assert_eq!(err, ParseKindError::Network("torus".to_string()));
        assert_eq!(err.to_string(), "unknown network kind: 'torus'");
    }

    #[test]
    fn test_interaction_aliases() {
        assert_eq!("dy".parse::<InteractionKind>().unwrap(), InteractionKind::Dyadic);
        assert_eq!("ho".parse::<InteractionKind>().unwrap(), InteractionKind::HigherOrder);
        assert_eq!("hord".parse::<InteractionKind>().unwrap(), InteractionKind::HigherOrder);
        assert!("triadic".parse::<InteractionKind>().is_err());
    }

    #[test]
    fn test_simulation_aliases() {
        assert_eq!("matrix".parse::<SimulationKind>().unwrap(), SimulationKind::Matrix);
        assert_eq!("abm".parse::<SimulationKind>().unwrap(), SimulationKind::Agent);
        assert_eq!("agent".parse::<SimulationKind>().unwrap(), SimulationKind::Agent);
        assert!("tensor".parse::<SimulationKind>().is_err());
    }

    #[test]
    fn test_variate_split() {
        let variate: Vec<_> = NetworkKind::all().iter().filter(|k| k.is_variate()).collect();
        assert_eq!(variate.len(), 4);
        assert!(!NetworkKind::Complete.is_variate());
        assert!(!NetworkKind::Hypercube.is_variate());
        assert!(NetworkKind::ErdosRenyi.is_variate());
    }

    #[test]
    fn test_kind_serialization_uses_codes() {
        assert_eq!(serde_json::to_string(&NetworkKind::Complete).unwrap(), r#""k_n""#);
        assert_eq!(serde_json::to_string(&InteractionKind::HigherOrder).unwrap(), r#""ho""#);
        assert_eq!(serde_json::to_string(&SimulationKind::Agent).unwrap(), r#""abm""#);
        assert_eq!(
            serde_json::from_str::<NetworkKind>(r#""ba""#).unwrap(),
            NetworkKind::BarabasiAlbert
        );
    }
}
