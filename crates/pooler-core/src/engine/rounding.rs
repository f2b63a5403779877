/// Rounds a volume to the nearest whole unit, resolving exact halves to the even neighbour.
///
/// Every rounded quantity in the search and the planner goes through this function so the two
/// stages can never disagree about a half-way volume.
#[inline]
pub fn round_volume(value: f64) -> f64 {
    value.round_ties_even()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves_round_to_even_neighbour() {
        assert_eq!(round_volume(0.5), 0.0);
        assert_eq!(round_volume(1.5), 2.0);
        assert_eq!(round_volume(2.5), 2.0);
        assert_eq!(round_volume(3.5), 4.0);
    }

    #[test]
    fn non_halves_round_to_nearest() {
        assert_eq!(round_volume(2.49), 2.0);
        assert_eq!(round_volume(2.51), 3.0);
        assert_eq!(round_volume(98.0), 98.0);
    }

    #[test]
    fn negative_halves_also_round_to_even() {
        assert_eq!(round_volume(-0.5), 0.0);
        assert_eq!(round_volume(-1.5), -2.0);
    }
}
