//! Tests for the Fock-space addressing

#[cfg(test)]
mod tests {
    use super::super::{
        FockPermutator, FockSpace, FrozenFockSpace, FrozenProductFockSpace, ProductFockSpace,
        SelectedFockSpace,
    };
    use crate::error::CiError;
    use crate::onv::Onv;
    use itertools::Itertools;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn all_onvs(fock_space: &FockSpace) -> Vec<Onv> {
        (0..fock_space.dimension())
            .map(|address| fock_space.make_onv(address))
            .collect()
    }

    #[test]
    fn test_calculate_dimension() {
        assert_eq!(FockSpace::calculate_dimension(4, 2).unwrap(), 6);
        assert_eq!(FockSpace::calculate_dimension(10, 5).unwrap(), 252);
        assert_eq!(FockSpace::calculate_dimension(5, 0).unwrap(), 1);
        assert_eq!(FockSpace::calculate_dimension(5, 5).unwrap(), 1);
        assert_eq!(
            FockSpace::calculate_dimension(64, 32).unwrap(),
            1_832_624_140_942_590_534
        );

        assert!(matches!(
            FockSpace::calculate_dimension(3, 4),
            Err(CiError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            FockSpace::calculate_dimension(100, 50),
            Err(CiError::Overflow(_))
        ));
    }

    #[test]
    fn test_construction_errors() {
        // overflow is reported before the bit width
        assert!(matches!(FockSpace::new(100, 50), Err(CiError::Overflow(_))));
        assert!(matches!(
            FockSpace::new(65, 1),
            Err(CiError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            ProductFockSpace::new(64, 32, 32),
            Err(CiError::Overflow(_))
        ));
        assert!(FrozenFockSpace::new(5, 2, 3).is_err());

        // the active space alone would fit, the full representation would not
        assert!(matches!(
            FrozenFockSpace::new(70, 12, 10),
            Err(CiError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            FrozenProductFockSpace::new(70, 12, 11, 10),
            Err(CiError::InvalidConfiguration(_))
        ));
        let widest = FrozenFockSpace::new(64, 12, 10).unwrap();
        let last = widest.calculate_representation(widest.dimension() - 1);
        assert_eq!(last.count_ones(), 12);
        assert_eq!(last >> 62, 0b11);
    }

    #[test]
    fn test_vertex_weights() {
        let fock_space = FockSpace::new(4, 2).unwrap();
        assert_eq!(fock_space.vertex_weight(0, 0), 1);
        assert_eq!(fock_space.vertex_weight(2, 0), 1);
        assert_eq!(fock_space.vertex_weight(3, 0), 0);
        assert_eq!(fock_space.vertex_weight(2, 1), 2);
        assert_eq!(fock_space.vertex_weight(3, 2), 3);
        assert_eq!(fock_space.vertex_weight(4, 2), 6);
        // outside the table
        assert_eq!(fock_space.vertex_weight(4, 3), 0);
        assert_eq!(fock_space.vertex_weight(5, 0), 0);
    }

    #[test]
    fn test_four_orbitals_two_electrons() {
        let fock_space = FockSpace::new(4, 2).unwrap();
        assert_eq!(fock_space.dimension(), 6);

        let expected = [0b0011u64, 0b0101, 0b0110, 0b1001, 0b1010, 0b1100];
        let mut onv = fock_space.make_onv(0);
        assert_eq!(onv.to_string(), "0011");

        for (address, &representation) in expected.iter().enumerate() {
            assert_eq!(onv.representation(), representation);
            assert_eq!(fock_space.get_onv_address(&onv), address);
            assert_eq!(fock_space.calculate_representation(address), representation);
            if address + 1 < expected.len() {
                fock_space.set_next_onv(&mut onv);
            }
        }
        assert_eq!(onv.occupation_indices(), &[2, 3]);
    }

    #[test]
    fn test_address_round_trip() {
        let fock_space = FockSpace::new(10, 4).unwrap();
        let mut onv = fock_space.make_onv(0);

        for address in 0..fock_space.dimension() {
            assert_eq!(fock_space.get_address(onv.representation()), address);
            assert_eq!(onv, fock_space.make_onv(address));
            assert_eq!(onv.n(), 4);
            if address + 1 < fock_space.dimension() {
                let next = fock_space.ulong_next_permutation(onv.representation());
                assert!(next > onv.representation());
                fock_space.set_next_onv(&mut onv);
            }
        }
        assert_eq!(onv.representation(), 0b1111000000);
    }

    #[test]
    fn test_addresses_cover_all_combinations() {
        for (k, n) in [(6, 3), (8, 2), (7, 7), (5, 1)] {
            let fock_space = FockSpace::new(k, n).unwrap();

            let mut addresses: Vec<usize> = (0..k)
                .combinations(n)
                .map(|orbitals| {
                    let representation = orbitals.iter().fold(0u64, |bits, &p| bits | (1 << p));
                    let address = fock_space.get_address(representation);
                    assert_eq!(fock_space.calculate_representation(address), representation);
                    address
                })
                .collect();

            addresses.sort_unstable();
            assert_eq!(addresses, (0..fock_space.dimension()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_sampled_round_trip_in_wide_spaces() {
        let mut rng = StdRng::seed_from_u64(60);

        for (k, n) in [(60, 30), (64, 32)] {
            let fock_space = FockSpace::new(k, n).unwrap();

            let mut representations: Vec<u64> = (0..200)
                .map(|_| {
                    rand::seq::index::sample(&mut rng, k, n)
                        .iter()
                        .fold(0u64, |bits, p| bits | (1 << p))
                })
                .collect();
            representations.sort_unstable();
            representations.dedup();

            let addresses: Vec<usize> = representations
                .iter()
                .map(|&representation| {
                    let address = fock_space.get_address(representation);
                    assert!(address < fock_space.dimension());
                    assert_eq!(fock_space.calculate_representation(address), representation);
                    address
                })
                .collect();

            // reverse lexical order: larger bit patterns have larger addresses
            assert!(addresses.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn test_edge_electron_counts() {
        let empty = FockSpace::new(5, 0).unwrap();
        assert_eq!(empty.dimension(), 1);
        assert_eq!(empty.calculate_representation(0), 0);
        assert_eq!(empty.get_address(0), 0);
        assert_eq!(empty.ulong_next_permutation(0), 0);

        let full = FockSpace::new(5, 5).unwrap();
        assert_eq!(full.dimension(), 1);
        assert_eq!(full.calculate_representation(0), 0b11111);
        assert_eq!(full.get_address(0b11111), 0);

        let wide = FockSpace::new(64, 1).unwrap();
        assert_eq!(wide.calculate_representation(63), 1u64 << 63);
        assert_eq!(wide.get_address(1u64 << 63), 63);
    }

    #[test]
    fn test_hartree_fock_expansion() {
        let fock_space = FockSpace::new(5, 2).unwrap();
        let expansion = fock_space.hartree_fock_expansion();
        assert_eq!(expansion.len(), 10);
        assert_eq!(expansion[0], 1.0);
        assert_eq!(expansion.sum(), 1.0);
    }

    #[test]
    fn test_forward_shift_single_excitations() {
        let fock_space = FockSpace::new(7, 3).unwrap();
        let k = 7;

        for onv in all_onvs(&fock_space) {
            let address = fock_space.get_onv_address(&onv);

            for e1 in 0..onv.n() {
                let p = onv.occupied_index(e1);
                let mut shifted = address - fock_space.vertex_weight(p, e1 + 1);
                let mut q = p + 1;
                let mut e2 = e1 + 1;
                let mut sign = 1;
                fock_space.shift_until_next_unoccupied_orbital_signed::<1>(
                    &onv, &mut shifted, &mut q, &mut e2, &mut sign,
                );

                while q < k {
                    let target = shifted + fock_space.vertex_weight(q, e2);

                    let mut excited = onv.clone();
                    let expected_sign = excited.annihilate_with_sign(p).unwrap()
                        * excited.create_with_sign(q).unwrap();
                    assert_eq!(target, fock_space.get_address(excited.representation()));
                    assert_eq!(sign, expected_sign);

                    q += 1;
                    fock_space.shift_until_next_unoccupied_orbital_signed::<1>(
                        &onv, &mut shifted, &mut q, &mut e2, &mut sign,
                    );
                }
            }
        }
    }

    #[test]
    fn test_forward_shift_unsigned_matches_signed() {
        let fock_space = FockSpace::new(6, 3).unwrap();
        let onv = fock_space.make_onv(7);
        let mut address_signed = 5;
        let mut address = 5;
        let (mut q_signed, mut e_signed, mut sign) = (onv.occupied_index(0), 0, 1);
        let (mut q, mut e) = (onv.occupied_index(0), 0);

        fock_space.shift_until_next_unoccupied_orbital_signed::<1>(
            &onv,
            &mut address_signed,
            &mut q_signed,
            &mut e_signed,
            &mut sign,
        );
        fock_space.shift_until_next_unoccupied_orbital::<1>(&onv, &mut address, &mut q, &mut e);

        assert_eq!(address, address_signed);
        assert_eq!((q, e), (q_signed, e_signed));
        assert!(e > 0);
    }

    #[test]
    fn test_backward_shift_single_excitations() {
        let fock_space = FockSpace::new(7, 3).unwrap();

        for onv in all_onvs(&fock_space) {
            let address = fock_space.get_onv_address(&onv);

            for e1 in 0..onv.n() {
                let q = onv.occupied_index(e1);
                let mut shifted = address - fock_space.vertex_weight(q, e1 + 1);
                let mut p = q as isize - 1;
                let mut e2 = e1 as isize - 1;
                let mut sign = 1;
                fock_space.shift_until_previous_unoccupied_orbital::<1>(
                    &onv, &mut shifted, &mut p, &mut e2, &mut sign,
                );

                while p >= 0 {
                    let target = shifted + fock_space.vertex_weight(p as usize, (e2 + 2) as usize);

                    let mut excited = onv.clone();
                    let expected_sign = excited.annihilate_with_sign(q).unwrap()
                        * excited.create_with_sign(p as usize).unwrap();
                    assert_eq!(target, fock_space.get_address(excited.representation()));
                    assert_eq!(sign, expected_sign);
                    assert!(target < address);

                    p -= 1;
                    fock_space.shift_until_previous_unoccupied_orbital::<1>(
                        &onv, &mut shifted, &mut p, &mut e2, &mut sign,
                    );
                }
            }
        }
    }

    #[test]
    fn test_coupling_counts_against_brute_force() {
        for (k, n) in [(6, 3), (7, 2), (5, 4), (4, 1)] {
            let fock_space = FockSpace::new(k, n).unwrap();
            let onvs = all_onvs(&fock_space);

            let mut sum_one = 0;
            let mut sum_two = 0;
            for (i, onv) in onvs.iter().enumerate() {
                let singles = onvs[i + 1..]
                    .iter()
                    .filter(|other| onv.count_number_of_differences(other) == 2)
                    .count();
                let doubles = onvs[i + 1..]
                    .iter()
                    .filter(|other| onv.count_number_of_differences(other) == 4)
                    .count();

                assert_eq!(fock_space.count_one_electron_couplings(onv), singles);
                assert_eq!(fock_space.count_two_electron_couplings(onv), singles + doubles);
                sum_one += singles;
                sum_two += singles + doubles;
            }

            assert_eq!(fock_space.count_total_one_electron_couplings(), 2 * sum_one);
            assert_eq!(fock_space.count_total_two_electron_couplings(), 2 * sum_two);
        }
    }

    #[test]
    fn test_frozen_fock_space() {
        let frozen = FrozenFockSpace::new(5, 3, 1).unwrap();
        assert_eq!(frozen.dimension(), 6);
        assert_eq!(frozen.number_of_frozen_orbitals(), 1);

        let mut onv = frozen.make_onv(0);
        assert_eq!(onv.representation(), 0b00111);
        frozen.set_next_onv(&mut onv);
        assert_eq!(onv.representation(), 0b01011);
        assert_eq!(frozen.get_onv_address(&onv), 1);

        for address in 0..frozen.dimension() {
            let representation = frozen.calculate_representation(address);
            assert_eq!(representation & 1, 1);
            assert_eq!(frozen.get_address(representation), address);
        }

        let everything = FrozenFockSpace::new(3, 3, 3).unwrap();
        assert_eq!(everything.dimension(), 1);
        assert_eq!(everything.calculate_representation(0), 0b111);
    }

    #[test]
    fn test_product_fock_space() {
        let product = ProductFockSpace::new(4, 2, 1).unwrap();
        assert_eq!(product.dimension(), 24);
        assert_eq!(product.compound_address(2, 3), 11);
        assert_eq!(product.hartree_fock_expansion()[0], 1.0);

        let frozen = FrozenProductFockSpace::new(5, 3, 2, 1).unwrap();
        assert_eq!(frozen.dimension(), 6 * 4);
        assert_eq!(frozen.active_product_fock_space().k(), 4);
        assert_eq!(frozen.active_product_fock_space().n_alpha(), 2);
        assert_eq!(frozen.active_product_fock_space().n_beta(), 1);
    }

    #[test]
    fn test_selected_from_spaces() {
        let fock_space = FockSpace::new(4, 2).unwrap();
        let doubly = SelectedFockSpace::from_fock_space(&fock_space).unwrap();
        assert_eq!(doubly.dimension(), 6);
        assert!(doubly
            .configurations()
            .iter()
            .all(|configuration| configuration.alpha == configuration.beta));
        assert_eq!(doubly.configuration(5).alpha.representation(), 0b1100);

        let product = ProductFockSpace::new(4, 2, 1).unwrap();
        let selected = SelectedFockSpace::from_product_fock_space(&product).unwrap();
        assert_eq!(selected.dimension(), 24);
        // compound address I_alpha * dim_beta + I_beta
        let configuration = selected.configuration(product.compound_address(1, 2));
        assert_eq!(configuration.alpha.representation(), 0b0101);
        assert_eq!(configuration.beta.representation(), 0b0100);

        let frozen = FrozenProductFockSpace::new(4, 2, 2, 1).unwrap();
        let selected = SelectedFockSpace::from_frozen_product_fock_space(&frozen).unwrap();
        assert_eq!(selected.dimension(), 9);
        assert!(selected
            .configurations()
            .iter()
            .all(|c| c.alpha.is_occupied(0) && c.beta.is_occupied(0)));
    }

    #[test]
    fn test_add_configuration() {
        let mut selected = SelectedFockSpace::new(4, 2, 2).unwrap();
        selected.add_configuration("0011", "0101").unwrap();
        assert_eq!(selected.dimension(), 1);
        assert_eq!(selected.configuration(0).alpha.occupation_indices(), &[0, 1]);
        assert_eq!(selected.configuration(0).beta.occupation_indices(), &[0, 2]);

        assert!(selected.add_configuration("011", "0101").is_err());
        assert!(selected.add_configuration("0111", "0101").is_err());
        assert!(selected.add_configuration("0a11", "0101").is_err());
        assert_eq!(selected.dimension(), 1);

        selected
            .add_configurations(&["1100", "1010"], &["0011", "1001"])
            .unwrap();
        assert_eq!(selected.dimension(), 3);
        assert!(selected.add_configurations(&["1100"], &[]).is_err());

        // a bad string anywhere in the batch leaves the selection unchanged
        assert!(selected
            .add_configurations(&["0011", "01x1"], &["0011", "0011"])
            .is_err());
        assert!(selected
            .add_configurations(&["0011", "0101"], &["0011", "0111"])
            .is_err());
        assert_eq!(selected.dimension(), 3);

        assert!(SelectedFockSpace::new(65, 1, 1).is_err());
        assert!(SelectedFockSpace::new(3, 4, 1).is_err());
    }
}
