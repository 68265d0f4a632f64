use std::fmt;
use crate::model::VarRef;

/// Everything that can go wrong between receiving an instance and handing back a decoded solution.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    EmptyDistanceMatrix,
    DistanceMatrixNotSquare { rows: usize, cols: usize },
    /// `service` must have one row per site, i.e. one fewer than the distance matrix.
    ServiceRowMismatch { expected: usize, found: usize },
    NegativeDistance { from: usize, to: usize, value: f64 },
    NonFiniteDistance { from: usize, to: usize, value: f64 },
    NonFiniteWeight { name: &'static str, value: f64 },
    SiteOutOfRange { site: usize, n_sites: usize },
    /// Variables were created for `(sites, demand points)` other than the instance's.
    SchemaMismatch { expected: (usize, usize), found: (usize, usize) },
    Infeasible,
    Unbounded,
    SolverFailed(String),
    /// The solver returned a different number of values than the model has variables.
    AssignmentLength { expected: usize, found: usize },
    /// A binary variable came back too far from 0 or 1.
    NotIntegral { var: VarRef, value: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for errors detected before a model is built.
    pub fn is_malformed_instance(&self) -> bool {
        use Error::*;
        matches!(self,
            EmptyDistanceMatrix | DistanceMatrixNotSquare{..} | ServiceRowMismatch{..}
            | NegativeDistance{..} | NonFiniteDistance{..} | NonFiniteWeight{..} | SiteOutOfRange{..})
    }

    /// True for contract violations between the model and the solver backend.
    pub fn is_solver_contract_violation(&self) -> bool {
        matches!(self, Error::AssignmentLength{..} | Error::NotIntegral{..})
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Error::*;
        match self {
            EmptyDistanceMatrix => write!(f, "distance matrix is empty, it must at least contain the depot"),
            DistanceMatrixNotSquare { rows, cols } =>
                write!(f, "distance matrix is {}x{}, expected a square matrix", rows, cols),
            ServiceRowMismatch { expected, found } =>
                write!(f, "service matrix has {} rows, expected {} (one per site)", found, expected),
            NegativeDistance { from, to, value } =>
                write!(f, "negative distance {} from node {} to node {}", value, from, to),
            NonFiniteDistance { from, to, value } =>
                write!(f, "non-finite distance {} from node {} to node {}", value, from, to),
            NonFiniteWeight { name, value } => write!(f, "weight `{}` is not finite ({})", name, value),
            SiteOutOfRange { site, n_sites } =>
                write!(f, "site {} does not exist (instance has {} sites)", site, n_sites),
            SchemaMismatch { expected, found } =>
                write!(f, "variables cover {} sites and {} demand points, instance has {} and {}",
                       found.0, found.1, expected.0, expected.1),
            Infeasible => write!(f, "solver reported the model infeasible"),
            Unbounded => write!(f, "solver reported the model unbounded"),
            SolverFailed(msg) => write!(f, "solver failed: {}", msg),
            AssignmentLength { expected, found } =>
                write!(f, "solver returned {} values for {} variables", found, expected),
            NotIntegral { var, value } =>
                write!(f, "solver returned {} for binary variable {}", value, var),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(Error::EmptyDistanceMatrix.is_malformed_instance());
        assert!(Error::NegativeDistance { from: 0, to: 1, value: -1.0 }.is_malformed_instance());
        assert!(!Error::Infeasible.is_malformed_instance());
        assert!(Error::NotIntegral { var: VarRef::Open(0), value: 0.5 }.is_solver_contract_violation());
        assert!(!Error::Unbounded.is_solver_contract_violation());
    }

    #[test]
    fn messages_name_the_offender() {
        let msg = Error::ServiceRowMismatch { expected: 3, found: 2 }.to_string();
        assert!(msg.contains('3') && msg.contains('2'));
        let msg = Error::NotIntegral { var: VarRef::Route(1, 2), value: 0.5 }.to_string();
        assert!(msg.contains("Y[1][2]"), "{}", msg);
    }
}
