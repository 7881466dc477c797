//! Tests for the Hamiltonian builders

#[cfg(test)]
mod tests {
    use super::super::{
        Doci, Fci, FrozenCoreCi, HamiltonianBuilder, HamiltonianParameters, HubbardModel,
        InMemoryIntegrals, IntegralProvider, SelectedCi, TwoElectronIntegrals,
    };
    use crate::error::CiError;
    use crate::fock_space_impl::{
        FockSpace, FrozenFockSpace, FrozenProductFockSpace, ProductFockSpace, SelectedFockSpace,
    };
    use nalgebra::{DMatrix, DVector};
    use std::borrow::Cow;

    fn max_abs_difference(a: &DMatrix<f64>, b: &DMatrix<f64>) -> f64 {
        assert_eq!(a.shape(), b.shape());
        (a - b).abs().max()
    }

    fn assert_builder_consistent(builder: &dyn HamiltonianBuilder, parameters: &HamiltonianParameters) {
        let hamiltonian = builder.construct_hamiltonian(parameters).unwrap();
        let diagonal = builder.calculate_diagonal(parameters).unwrap();
        let dim = builder.dimension();
        assert_eq!(hamiltonian.shape(), (dim, dim));

        assert!(max_abs_difference(&hamiltonian, &hamiltonian.transpose()) < 1e-12);
        for i in 0..dim {
            assert!((hamiltonian[(i, i)] - diagonal[i]).abs() < 1e-12);
        }

        for _ in 0..3 {
            let x = DVector::<f64>::new_random(dim);
            let product = builder
                .matrix_vector_product(parameters, &x, &diagonal)
                .unwrap();
            let expected = &hamiltonian * &x;
            assert!((product - expected).abs().max() < 1e-10);
        }

        let operator = builder
            .matrix_vector_operator(Cow::Borrowed(parameters), &diagonal)
            .unwrap();
        for _ in 0..3 {
            let x = DVector::<f64>::new_random(dim);
            let expected = &hamiltonian * &x;
            assert!((operator(&x).unwrap() - expected).abs().max() < 1e-10);
        }
    }

    #[test]
    fn test_parameters_validation() {
        let h = DMatrix::<f64>::zeros(3, 4);
        assert!(HamiltonianParameters::new(h, TwoElectronIntegrals::zeros(3), 0.0).is_err());

        let h = DMatrix::<f64>::zeros(3, 3);
        assert!(matches!(
            HamiltonianParameters::new(h, TwoElectronIntegrals::zeros(4), 0.0),
            Err(CiError::InvalidConfiguration(_))
        ));

        let parameters = HamiltonianParameters::random(4);
        assert_eq!(parameters.k(), 4);
        assert!(max_abs_difference(&parameters.h, &parameters.h.transpose()) < 1e-14);
        assert!(parameters.g.is_symmetric(1e-14));
    }

    #[test]
    fn test_incomplete_two_electron_integrals() {
        let g: TwoElectronIntegrals =
            serde_yml::from_str("k: 2\nvalues: [1.0, 2.0, 3.0]\n").unwrap();
        assert!(!g.is_complete());
        assert!(TwoElectronIntegrals::zeros(2).is_complete());

        assert!(matches!(
            HamiltonianParameters::new(DMatrix::zeros(2, 2), g.clone(), 0.0),
            Err(CiError::InvalidConfiguration(_))
        ));

        let stored = InMemoryIntegrals {
            one_electron: DMatrix::zeros(2, 2),
            two_electron: g,
            constant: 0.0,
        };
        assert!(matches!(
            HamiltonianParameters::from_provider(&stored),
            Err(CiError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_matrix_vector_operator_from_owned_parameters() {
        let parameters = HamiltonianParameters::random(5);
        let frozen = FrozenCoreCi::fci(&FrozenProductFockSpace::new(5, 3, 2, 1).unwrap());
        let hamiltonian = frozen.construct_hamiltonian(&parameters).unwrap();
        let diagonal = frozen.calculate_diagonal(&parameters).unwrap();

        let operator = frozen
            .matrix_vector_operator(Cow::Owned(parameters.clone()), &diagonal)
            .unwrap();
        let mut x = DVector::<f64>::zeros(frozen.dimension());
        for i in 0..frozen.dimension() {
            x[i] = 1.0;
            let column = operator(&x).unwrap();
            assert!((column - hamiltonian.column(i)).abs().max() < 1e-10);
            x[i] = 0.0;
        }

        assert!(matches!(
            operator(&DVector::zeros(frozen.dimension() + 1)),
            Err(CiError::InvalidConfiguration(_))
        ));
        let fci = Fci::new(ProductFockSpace::new(4, 2, 1).unwrap());
        assert!(fci
            .matrix_vector_operator(Cow::Owned(parameters), &diagonal)
            .is_err());
    }

    #[test]
    fn test_hubbard_integrals() {
        let chain = HubbardModel::chain(3, 1.0, 4.0);
        let h = chain.one_electron_integrals();
        assert_eq!(h[(0, 1)], -1.0);
        assert_eq!(h[(1, 2)], -1.0);
        assert_eq!(h[(0, 2)], 0.0);
        let g = chain.two_electron_integrals();
        assert_eq!(g[(1, 1, 1, 1)], 4.0);
        assert_eq!(g[(0, 0, 1, 1)], 0.0);

        let ring = HubbardModel::ring(4, 0.5, 1.0);
        assert_eq!(ring.one_electron_integrals()[(0, 3)], -0.5);

        let dimer = HubbardModel::ring(2, 1.0, 1.0);
        assert_eq!(dimer.one_electron_integrals()[(0, 1)], -1.0);

        let parameters = HamiltonianParameters::from_provider(&chain).unwrap();
        assert_eq!(parameters.k(), 3);
        assert_eq!(parameters.constant, 0.0);
    }

    #[test]
    fn test_doci_builder() {
        let parameters = HamiltonianParameters::random(4);
        let doci = Doci::new(FockSpace::new(4, 2).unwrap());
        assert_eq!(doci.dimension(), 6);
        assert_builder_consistent(&doci, &parameters);

        let parameters = HamiltonianParameters::random(6);
        let doci = Doci::new(FockSpace::new(6, 3).unwrap());
        assert_builder_consistent(&doci, &parameters);
    }

    #[test]
    fn test_doci_pair_excitation_element() {
        let parameters = HamiltonianParameters::random(4);
        let doci = Doci::new(FockSpace::new(4, 2).unwrap());
        let hamiltonian = doci.construct_hamiltonian(&parameters).unwrap();

        // 0011 -> 0101 moves the pair from orbital 1 to orbital 2
        assert!((hamiltonian[(0, 1)] - parameters.g[(1, 2, 1, 2)]).abs() < 1e-14);
        // 0011 and 1100 differ by two pairs
        assert_eq!(hamiltonian[(0, 5)], 0.0);
    }

    #[test]
    fn test_fci_builder() {
        let parameters = HamiltonianParameters::random(4);
        for (n_alpha, n_beta) in [(2, 2), (2, 1), (1, 0), (3, 1)] {
            let fci = Fci::new(ProductFockSpace::new(4, n_alpha, n_beta).unwrap());
            assert_builder_consistent(&fci, &parameters);
        }
    }

    #[test]
    fn test_fci_matches_selected_ci() {
        let parameters = HamiltonianParameters::random(5);
        let product = ProductFockSpace::new(5, 2, 3).unwrap();

        let fci = Fci::new(product.clone());
        let selected = SelectedCi::new(SelectedFockSpace::from_product_fock_space(&product).unwrap());
        assert_builder_consistent(&selected, &parameters);

        let difference = max_abs_difference(
            &fci.construct_hamiltonian(&parameters).unwrap(),
            &selected.construct_hamiltonian(&parameters).unwrap(),
        );
        assert!(difference < 1e-10, "difference {}", difference);
    }

    #[test]
    fn test_doci_matches_selected_ci() {
        let parameters = HamiltonianParameters::random(5);
        let fock_space = FockSpace::new(5, 2).unwrap();

        let doci = Doci::new(fock_space.clone());
        let selected = SelectedCi::new(SelectedFockSpace::from_fock_space(&fock_space).unwrap());

        let difference = max_abs_difference(
            &doci.construct_hamiltonian(&parameters).unwrap(),
            &selected.construct_hamiltonian(&parameters).unwrap(),
        );
        assert!(difference < 1e-10, "difference {}", difference);
    }

    #[test]
    fn test_doci_is_seniority_zero_block_of_fci() {
        let parameters = HamiltonianParameters::random(4);
        let doci = Doci::new(FockSpace::new(4, 2).unwrap())
            .construct_hamiltonian(&parameters)
            .unwrap();
        let fci = Fci::new(ProductFockSpace::new(4, 2, 2).unwrap())
            .construct_hamiltonian(&parameters)
            .unwrap();

        let dim = 6;
        for i in 0..dim {
            for j in 0..dim {
                let element = fci[(i * dim + i, j * dim + j)];
                assert!((doci[(i, j)] - element).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_frozen_core_shift() {
        let parameters = HamiltonianParameters::random(4);
        let frozen = FrozenCoreCi::doci(&FrozenFockSpace::new(4, 2, 1).unwrap());
        assert_eq!(frozen.number_of_orbitals(), 4);
        assert_eq!(frozen.dimension(), 3);

        let active_parameters = FrozenCoreCi::freeze_parameters(&parameters, 1).unwrap();
        assert_eq!(active_parameters.k(), 3);
        assert!(active_parameters.g.is_symmetric(1e-14));

        let core_energy = FrozenCoreCi::frozen_core_energy(&parameters, 1);
        assert!(
            (core_energy - (2.0 * parameters.h[(0, 0)] + parameters.g[(0, 0, 0, 0)])).abs() < 1e-14
        );

        let diagonal = frozen.calculate_diagonal(&parameters).unwrap();
        let active_diagonal = frozen
            .active_builder()
            .calculate_diagonal(&active_parameters)
            .unwrap();
        for i in 0..3 {
            assert!((diagonal[i] - active_diagonal[i] - core_energy).abs() < 1e-12);
        }

        assert_builder_consistent(&frozen, &parameters);
    }

    #[test]
    fn test_frozen_core_doci_matches_selected_ci() {
        let parameters = HamiltonianParameters::random(4);
        let frozen = FrozenCoreCi::doci(&FrozenFockSpace::new(4, 2, 1).unwrap());

        let mut selected_space = SelectedFockSpace::new(4, 2, 2).unwrap();
        selected_space
            .add_configurations(&["0011", "0101", "1001"], &["0011", "0101", "1001"])
            .unwrap();
        let selected = SelectedCi::new(selected_space);

        let difference = max_abs_difference(
            &frozen.construct_hamiltonian(&parameters).unwrap(),
            &selected.construct_hamiltonian(&parameters).unwrap(),
        );
        assert!(difference < 1e-10, "difference {}", difference);
    }

    #[test]
    fn test_frozen_core_fci_matches_selected_ci() {
        let parameters = HamiltonianParameters::random(5);
        let fock_space = FrozenProductFockSpace::new(5, 3, 2, 1).unwrap();

        let frozen = FrozenCoreCi::fci(&fock_space);
        let selected = SelectedCi::new(
            SelectedFockSpace::from_frozen_product_fock_space(&fock_space).unwrap(),
        );
        assert_eq!(frozen.dimension(), selected.dimension());

        let difference = max_abs_difference(
            &frozen.construct_hamiltonian(&parameters).unwrap(),
            &selected.construct_hamiltonian(&parameters).unwrap(),
        );
        assert!(difference < 1e-10, "difference {}", difference);
    }

    #[test]
    fn test_fully_frozen_core_energy() {
        let parameters = HamiltonianParameters::random(4);
        let frozen = FrozenCoreCi::doci(&FrozenFockSpace::new(4, 2, 2).unwrap());
        assert_eq!(frozen.dimension(), 1);

        let doci_diagonal = Doci::new(FockSpace::new(4, 2).unwrap())
            .calculate_diagonal(&parameters)
            .unwrap();
        let frozen_diagonal = frozen.calculate_diagonal(&parameters).unwrap();
        assert!((frozen_diagonal[0] - doci_diagonal[0]).abs() < 1e-12);
        assert!(
            (FrozenCoreCi::frozen_core_energy(&parameters, 2) - doci_diagonal[0]).abs() < 1e-12
        );

        assert!(FrozenCoreCi::freeze_parameters(&parameters, 5).is_err());
    }

    #[test]
    fn test_orbital_mismatch() {
        let parameters = HamiltonianParameters::random(5);
        let builders: Vec<Box<dyn HamiltonianBuilder>> = vec![
            Box::new(Doci::new(FockSpace::new(4, 2).unwrap())),
            Box::new(Fci::new(ProductFockSpace::new(4, 1, 1).unwrap())),
            Box::new(FrozenCoreCi::doci(&FrozenFockSpace::new(4, 2, 1).unwrap())),
        ];

        for builder in &builders {
            assert!(matches!(
                builder.construct_hamiltonian(&parameters),
                Err(CiError::InvalidConfiguration(_))
            ));
            assert!(builder.calculate_diagonal(&parameters).is_err());
            let x = DVector::zeros(builder.dimension());
            assert!(builder.matrix_vector_product(&parameters, &x, &x).is_err());
        }

        let parameters = HamiltonianParameters::random(4);
        let doci = Doci::new(FockSpace::new(4, 2).unwrap());
        let x = DVector::zeros(5);
        let diagonal = DVector::zeros(6);
        assert!(doci.matrix_vector_product(&parameters, &x, &diagonal).is_err());
    }
}
