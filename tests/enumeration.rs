//! End-to-end enumeration scenarios

use duplex::{
    parse_domain_lengths, parse_process, species_list_from_process, ConstraintChecker,
    EnumerateError, EnumeratorSettings, GeometricEnumerator, Species, TransitionKind,
};

fn enumerator(seed: u64) -> GeometricEnumerator {
    GeometricEnumerator::new(
        EnumeratorSettings::new("adjacent_detailed"),
        ConstraintChecker::new(Some(seed)),
    )
    .unwrap()
}

fn species_of(process: &str, lengths: &str) -> Species {
    let p = parse_process(process).unwrap();
    let l = parse_domain_lengths(lengths).unwrap();
    let mut list = species_list_from_process(&p, &l).unwrap();
    assert_eq!(list.len(), 1, "expected a single connected species");
    list.remove(0)
}

#[test]
fn long_domain_binding_is_irreversible() {
    let mut e = enumerator(7);
    let crn = e.enumerate_input("( <x> | <x*> )", "longDomain x length 20").unwrap();
    // Two singles plus the duplex product
    assert_eq!(crn.species().len(), 3);
    assert_eq!(crn.reactions().len(), 1);
    let r = &crn.reactions()[0];
    assert!(!r.is_reversible());
    assert_eq!(r.metadata().unwrap().kind, TransitionKind::Binding);
    assert_eq!(r.reactants().len(), 2);
    assert_eq!(r.products().len(), 1);
    let duplex = species_of("( <x!i1> | <x*!i1> )", "longDomain x length 20");
    assert!(crn.species().contains(&duplex));
}

#[test]
fn toehold_binding_is_reversible() {
    let mut e = enumerator(7);
    let crn = e.enumerate_input("( <t^> | <t^*> )", "toeholdDomain t length 5").unwrap();
    assert_eq!(crn.species().len(), 3);
    assert_eq!(crn.reactions().len(), 1);
    let r = &crn.reactions()[0];
    assert!(r.is_reversible());
    assert_eq!(r.fwd_rate(), 0.003);
    assert_eq!(r.bwd_rate(), Some(0.1));
}

#[test]
fn toehold_mediated_strand_displacement() {
    let lengths = "toeholdDomain t length 5 longDomain x length 20";
    let mut e = enumerator(7);
    let crn = e
        .enumerate_input("( <t^ x> | <x!i1> | <x*!i1 t^*> )", lengths)
        .unwrap();
    // invader, gate, toehold-bound intermediate, waste duplex, displaced <x>
    assert_eq!(crn.species().len(), 5);
    assert_eq!(crn.reactions().len(), 2);

    let reversible: Vec<_> = crn.reactions().iter().filter(|r| r.is_reversible()).collect();
    assert_eq!(reversible.len(), 1);
    assert_eq!(reversible[0].metadata().unwrap().kind, TransitionKind::Binding);

    let displacement: Vec<_> =
        crn.reactions().iter().filter(|r| !r.is_reversible()).collect();
    assert_eq!(displacement.len(), 1);
    let meta = displacement[0].metadata().unwrap();
    assert_eq!(meta.kind, TransitionKind::ThreeWayMigration);
    // The invading edge re-pairs one endpoint of the displaced edge
    let (a1, a2) = meta.edges_added[0].sites();
    let (r1, r2) = meta.edges_removed[0].sites();
    assert!(a1 == r1 || a1 == r2 || a2 == r1 || a2 == r2);

    let displaced = species_of("<x>", lengths);
    let waste = species_of("( <t^!a x!b> | <x*!b t^*!a> )", lengths);
    assert!(crn.species().contains(&displaced));
    assert!(crn.species().contains(&waste));
}

#[test]
fn three_way_migration_between_bound_strands() {
    let lengths = "longDomain A length 20 longDomain B length 20";
    let mut e = enumerator(7);
    let crn = e
        .enumerate_input("( <A!i1> | <A B!i2> | <B*!i2 A*!i1> )", lengths)
        .unwrap();
    assert_eq!(crn.species().len(), 3);
    assert_eq!(crn.reactions().len(), 1);
    let r = &crn.reactions()[0];
    assert!(!r.is_reversible());
    assert_eq!(r.metadata().unwrap().kind, TransitionKind::ThreeWayMigration);
    // The displaced single strand is released
    let released = species_of("<A>", lengths);
    assert!(crn.species().contains(&released));
    // Every reaction participant is in the species table
    for r in crn.reactions() {
        for s in r.species_involved() {
            assert!(crn.species().contains(s));
        }
    }
}

#[test]
fn hairpin_loop_admits_the_loop_binding() {
    let lengths = "longDomain x length 20 toeholdDomain spcr1 length 6 \
                   toeholdDomain spcr2 length 6 longDomain y length 20";
    let mut e = enumerator(7);
    let crn = e
        .enumerate_input("( <x!i1 spcr1^ y* spcr2^ x*!i1> | <y> )", lengths)
        .unwrap();
    // The free <y> can reach the loop interior: hairpin, <y>, bound product
    assert_eq!(crn.species().len(), 3);
    assert_eq!(crn.reactions().len(), 1);
    let r = &crn.reactions()[0];
    assert_eq!(r.metadata().unwrap().kind, TransitionKind::Binding);
    assert!(!r.is_reversible());
}

#[test]
fn four_way_exchange_is_reversible() {
    let lengths = "longDomain A length 20 longDomain B length 20 longDomain E length 20 \
                   longDomain F length 20 longDomain G length 20 longDomain H length 20";
    let mut e = enumerator(7);
    let crn = e
        .enumerate_input(
            "( <E!i5 A!i1 B!i2 F!i7> | <F*!i7 B*!i2 A*!i3 G*!i6> \
             | <G!i6 A!i3 B!i4 H!i8> | <H*!i8 B*!i4 A*!i1 E*!i5> )",
            lengths,
        )
        .unwrap();
    // The Holliday junction can exchange either bond pair at the crossover,
    // yielding one migration isomer in each direction
    assert_eq!(crn.species().len(), 3);
    assert_eq!(crn.reactions().len(), 2);
    for r in crn.reactions() {
        assert!(r.is_reversible());
        let meta = r.metadata().unwrap();
        assert_eq!(meta.kind, TransitionKind::FourWayMigration);
        assert_eq!(meta.edges_added.len(), 2);
        assert_eq!(meta.edges_removed.len(), 2);
    }
}

#[test]
fn zero_nucleotide_loop_input_is_rejected() {
    let mut e = enumerator(7);
    let err = e
        .enumerate_input("( <t^ t^*> )", "toeholdDomain t length 14")
        .unwrap_err();
    assert!(matches!(err, EnumerateError::ZeroNucleotideLoop { .. }));
}

#[test]
fn exceeding_max_complex_size_is_fatal() {
    let settings = EnumeratorSettings::new("bounded").with_max_complex_size(2);
    let mut e =
        GeometricEnumerator::new(settings, ConstraintChecker::new(Some(7))).unwrap();
    let err = e
        .enumerate_input(
            "( <t^ x> | <x!i1> | <x*!i1 t^*> )",
            "toeholdDomain t length 5 longDomain x length 20",
        )
        .unwrap_err();
    match err {
        EnumerateError::ComplexSizeExceeded { max, .. } => assert_eq!(max, 2),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn enumeration_is_deterministic_for_a_fixed_seed() {
    let input = "( <t^ x> | <x!i1> | <x*!i1 t^*> )";
    let lengths = "toeholdDomain t length 5 longDomain x length 20";
    let crn_a = enumerator(42).enumerate_input(input, lengths).unwrap();
    let crn_b = enumerator(42).enumerate_input(input, lengths).unwrap();
    assert_eq!(crn_a.to_string(), crn_b.to_string());
    // Reseeding an existing enumerator reproduces its first run
    let mut e = enumerator(42);
    let first = e.enumerate_input(input, lengths).unwrap().to_string();
    e.reseed(Some(42));
    let second = e.enumerate_input(input, lengths).unwrap().to_string();
    assert_eq!(first, second);
}

#[test]
fn duplicate_input_species_are_rejected() {
    let lengths = parse_domain_lengths("longDomain x length 20").unwrap();
    let process = parse_process("( <x> | <x> )").unwrap();
    let species = species_list_from_process(&process, &lengths).unwrap();
    let mut e = enumerator(7);
    assert!(matches!(
        e.enumerate(species),
        Err(EnumerateError::DuplicateInputSpecies(_))
    ));
}

#[test]
fn rigid_ring_input_is_silently_dropped() {
    // A closed ring of rigid helices cannot be embedded; the input species
    // is implausible, so the CRN comes back empty rather than erroring.
    let mut e = enumerator(7);
    let crn = e
        .enumerate_input(
            "( <A!i1 B!i2> | <B*!i2 A*!i3> | <A!i3 B!i4> | <B*!i4 A*!i1> )",
            "longDomain A length 20 longDomain B length 20",
        )
        .unwrap();
    assert!(crn.species().is_empty());
    assert!(crn.reactions().is_empty());
}
