use crate::core::labware::layout::{LabwareLayout, LayoutError};
use crate::core::models::peptide::{PlannedPeptide, PoolGroup};
use crate::core::models::transfer::{Transfer, TransferKind, WellPosition};
use crate::workflows::pool::PoolingResult;
use tracing::debug;

/// Orders the liquid-handling steps for a pooling result.
///
/// Water goes into every dilution well first, then peptide stock, then each diluted peptide
/// is moved to the pool, and finally the neat peptides are drawn straight from their trays.
/// Zero-volume steps are omitted.
pub fn build_transfer_plan(
    result: &PoolingResult,
    layout: &LabwareLayout,
) -> Result<Vec<Transfer>, LayoutError> {
    let diluted: Vec<&PlannedPeptide> = result
        .peptides()
        .iter()
        .filter(|p| p.group == PoolGroup::Diluted)
        .collect();
    let neat = result.peptides().iter().filter(|p| p.group == PoolGroup::Neat);

    let mut transfers = Vec::new();
    for planned in &diluted {
        push_transfer(
            &mut transfers,
            planned,
            TransferKind::DilutionWater,
            layout.water().clone(),
            plate_well(layout, planned)?.clone(),
            planned.water_for_dilution,
        );
    }
    for planned in &diluted {
        push_transfer(
            &mut transfers,
            planned,
            TransferKind::DilutionPeptide,
            tray_well(layout, planned)?.clone(),
            plate_well(layout, planned)?.clone(),
            planned.peptide_for_dilution,
        );
    }
    for planned in &diluted {
        push_transfer(
            &mut transfers,
            planned,
            TransferKind::PoolDiluted,
            plate_well(layout, planned)?.clone(),
            layout.pool().clone(),
            planned.diluted_volume,
        );
    }
    for planned in neat {
        push_transfer(
            &mut transfers,
            planned,
            TransferKind::PoolNeat,
            tray_well(layout, planned)?.clone(),
            layout.pool().clone(),
            planned.diluted_volume,
        );
    }

    debug!("Built transfer plan with {} step(s).", transfers.len());
    Ok(transfers)
}

fn push_transfer(
    transfers: &mut Vec<Transfer>,
    planned: &PlannedPeptide,
    kind: TransferKind,
    source: WellPosition,
    destination: WellPosition,
    volume: f64,
) {
    if volume > 0.0 {
        transfers.push(Transfer {
            peptide: planned.id(),
            kind,
            source,
            destination,
            volume,
        });
    }
}

fn tray_well<'a>(
    layout: &'a LabwareLayout,
    planned: &PlannedPeptide,
) -> Result<&'a WellPosition, LayoutError> {
    layout
        .tray_position(planned.id())
        .ok_or_else(|| LayoutError::MissingTrayWell {
            id: planned.id(),
            sequence: planned.peptide.sequence.clone(),
        })
}

fn plate_well<'a>(
    layout: &'a LabwareLayout,
    planned: &PlannedPeptide,
) -> Result<&'a WellPosition, LayoutError> {
    layout
        .plate_position(planned.id())
        .ok_or_else(|| LayoutError::UnplacedPeptide {
            id: planned.id(),
            sequence: planned.peptide.sequence.clone(),
        })
}
