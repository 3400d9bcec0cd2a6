//! Unit tests for the `CanId` accessors and builder.
use super::*;

//==================================================================================CAN_ID
#[test]
/// PDU1 identifier: PS is the destination, PGN low byte stays zero.
fn test_parse_pdu1() {
    let id = CanId::parse((3 << 26) | (0xEC << 16) | (0x45 << 8) | 0x22);
    assert_eq!(id.priority(), 3);
    assert_eq!(id.pgn(), 0xEC00);
    assert_eq!(id.source_address(), 0x22);
    assert_eq!(id.destination_address(), 0x45);
    assert!(id.is_pdu1());
}

#[test]
/// PDU2 identifier: PS folds into the PGN, destination is global.
fn test_parse_pdu2() {
    let id = CanId::parse((6 << 26) | (1 << 24) | (0xF1 << 16) | (0x10 << 8) | 0xAB);
    assert_eq!(id.priority(), 6);
    assert_eq!(id.pgn(), 0x1F110);
    assert_eq!(id.source_address(), 0xAB);
    assert_eq!(id.destination_address(), BROADCAST);
    assert!(id.is_pdu2());
}

#[test]
/// Parsing masks stray bits above bit 28.
fn test_parse_masks_to_29_bits() {
    let id = CanId::parse(0xFFFF_FFFF);
    assert_eq!(id.raw(), 0x1FFF_FFFF);
    assert_eq!(id.priority(), 7);
}

//==================================================================================CAN_ID_BUILDER
#[test]
/// Broadcast (PDU2) and addressed (PDU1) construction round-trip.
fn test_builder_round_trip() {
    // PGN 129029 (GNSS Position) is PDU2.
    let position = CanId::builder(129029, 35).with_priority(3).build().unwrap();
    assert_eq!(position.pgn(), 129029);
    assert_eq!(position.priority(), 3);
    assert_eq!(position.source_address(), 35);
    assert_eq!(position.destination_address(), BROADCAST);

    // PGN 59904 (ISO Request) is PDU1.
    let request = CanId::builder(59904, 35)
        .with_priority(6)
        .to_destination(80)
        .build()
        .unwrap();
    assert_eq!(request.pgn(), 59904);
    assert_eq!(request.destination_address(), 80);
    assert_eq!(request.source_address(), 35);
}

#[test]
/// A PDU1 PGN without an explicit destination goes global.
fn test_builder_pdu1_defaults_to_broadcast() {
    let id = CanId::builder(0xEC00, 10).build().unwrap();
    assert_eq!(id.destination_address(), BROADCAST);
}

#[test]
/// PDU2 construction ignores any provided destination.
fn test_builder_pdu2_ignores_destination() {
    let id = CanId::builder(0x1F110, 0xAB).to_destination(80).build().unwrap();
    assert_eq!(id.pgn(), 0x1F110);
    assert_eq!(id.destination_address(), BROADCAST);
}

#[test]
/// PDU1 PGNs must keep their low byte clear.
fn test_builder_rejects_dirty_pdu1_pgn() {
    assert!(matches!(
        CanId::builder(0xEC05, 10).to_destination(80).build(),
        Err(CanIdError::NonZeroPdu1Low { pgn: 0xEC05 })
    ));
}

#[test]
/// Priorities occupy three bits; anything larger is an error.
fn test_builder_rejects_bad_priority() {
    assert!(matches!(
        CanId::builder(129029, 35).with_priority(8).build(),
        Err(CanIdError::PriorityOutOfRange { priority: 8 })
    ));
}

#[test]
/// Built identifiers never exceed 29 bits, whatever the inputs.
fn test_builder_never_exceeds_29_bits() {
    for pgn in [0u32, 0xEC00, 0xF110, 0x1F110, 129029, 130323] {
        for priority in 0..=7u8 {
            let id = CanId::builder(pgn, 0xFE).with_priority(priority).build().unwrap();
            assert_eq!(id.raw() & !0x1FFF_FFFF, 0);
        }
    }
}

#[test]
/// Property: parse(build(..)) restores the tuple, modulo PDU2 broadcast.
fn test_build_parse_round_trip() {
    let cases = [
        (0xEC00u32, 3u8, 0x22u8, Some(0x45u8)),
        (0xEA00, 6, 0xFE, Some(0x00)),
        (129029, 2, 35, None),
        (0x1F110, 7, 0xAB, None),
    ];
    for (pgn, priority, source, destination) in cases {
        let mut builder = CanId::builder(pgn, source).with_priority(priority);
        if let Some(destination) = destination {
            builder = builder.to_destination(destination);
        }
        let id = CanId::parse(builder.build().unwrap().raw());
        assert_eq!(id.pgn(), pgn);
        assert_eq!(id.priority(), priority);
        assert_eq!(id.source_address(), source);
        assert_eq!(id.destination_address(), destination.unwrap_or(BROADCAST));
    }
}
