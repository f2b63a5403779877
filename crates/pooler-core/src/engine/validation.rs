use super::error::EngineError;
use crate::core::models::peptide::Peptide;
use std::collections::HashSet;

/// Rejects non-positive or non-finite concentrations and repeated identifiers.
pub(crate) fn validate_peptides(peptides: &[Peptide]) -> Result<(), EngineError> {
    let mut seen = HashSet::with_capacity(peptides.len());
    for peptide in peptides {
        if !(peptide.concentration.is_finite() && peptide.concentration > 0.0) {
            return Err(EngineError::InvalidConcentration {
                id: peptide.id,
                value: peptide.concentration,
            });
        }
        if !seen.insert(peptide.id) {
            return Err(EngineError::DuplicatePeptide { id: peptide.id });
        }
    }
    Ok(())
}

pub(crate) fn ensure_sorted(peptides: &[Peptide]) -> Result<(), EngineError> {
    match peptides
        .windows(2)
        .find(|pair| pair[0].concentration > pair[1].concentration)
    {
        Some(pair) => Err(EngineError::DegenerateInput(format!(
            "peptides must be sorted by ascending concentration, but {} ({}) precedes {} ({})",
            pair[0].id, pair[0].concentration, pair[1].id, pair[1].concentration
        ))),
        None => Ok(()),
    }
}

/// Returns a copy of the peptides in ascending concentration order; ties keep input order.
pub(crate) fn sort_by_concentration(peptides: &[Peptide]) -> Vec<Peptide> {
    let mut sorted = peptides.to_vec();
    sorted.sort_by(|a, b| a.concentration.total_cmp(&b.concentration));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::peptide::PeptideId;

    #[test]
    fn accepts_positive_unique_peptides() {
        let peptides = vec![Peptide::new(1, "A", 1.0), Peptide::new(2, "B", 0.1)];
        assert!(validate_peptides(&peptides).is_ok());
    }

    #[test]
    fn rejects_zero_concentration_with_identifier() {
        let peptides = vec![Peptide::new(1, "A", 1.0), Peptide::new(9, "B", 0.0)];
        match validate_peptides(&peptides) {
            Err(EngineError::InvalidConcentration { id, value }) => {
                assert_eq!(id, PeptideId(9));
                assert_eq!(value, 0.0);
            }
            other => panic!("Expected InvalidConcentration, got {:?}", other),
        }
    }

    #[test]
    fn rejects_nan_and_negative_concentrations() {
        assert!(matches!(
            validate_peptides(&[Peptide::new(1, "A", f64::NAN)]),
            Err(EngineError::InvalidConcentration { .. })
        ));
        assert!(matches!(
            validate_peptides(&[Peptide::new(1, "A", -3.0)]),
            Err(EngineError::InvalidConcentration { .. })
        ));
        assert!(matches!(
            validate_peptides(&[Peptide::new(1, "A", f64::INFINITY)]),
            Err(EngineError::InvalidConcentration { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_identifiers() {
        let peptides = vec![Peptide::new(3, "A", 1.0), Peptide::new(3, "B", 2.0)];
        assert!(matches!(
            validate_peptides(&peptides),
            Err(EngineError::DuplicatePeptide { id }) if id == PeptideId(3)
        ));
    }

    #[test]
    fn sorting_is_ascending_and_stable() {
        let peptides = vec![
            Peptide::new(1, "A", 4.0),
            Peptide::new(2, "B", 1.0),
            Peptide::new(3, "C", 4.0),
            Peptide::new(4, "D", 2.0),
        ];
        let ids: Vec<u32> = sort_by_concentration(&peptides)
            .iter()
            .map(|p| p.id.0)
            .collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn ensure_sorted_reports_first_inversion() {
        let peptides = vec![Peptide::new(1, "A", 2.0), Peptide::new(2, "B", 1.0)];
        assert!(matches!(
            ensure_sorted(&peptides),
            Err(EngineError::DegenerateInput(msg)) if msg.contains("#1")
        ));
        assert!(ensure_sorted(&sort_by_concentration(&peptides)).is_ok());
    }
}
