mod common;

use common::SimBus;
use plcpi::{Board, EdgeMode, Error, MoveProfile};

#[test]
fn open_reports_revision() {
    let bus = SimBus::new().with_card(5, 4);
    let board = Board::init(bus.clone(), 5).unwrap();

    assert_eq!(board.address(), 0x2d);
    assert_eq!(board.revision().hw_major, 4);
    assert_eq!(board.revision().fw_major, 1);
    assert_eq!(board.revision().fw_minor, 4);
}

#[test]
fn relay_register_round_trip() {
    let bus = SimBus::new().with_card(0, 3);
    let mut board = Board::init(bus.clone(), 0).unwrap();

    board.relays_write_verified(0xa5).unwrap();
    assert_eq!(board.relays_get().unwrap(), 0xa5);
    for ch in 1..=8u8 {
        assert_eq!(board.relay_get(ch).unwrap(), 0xa5 & (1 << (ch - 1)) != 0);
    }
}

#[test]
fn stuck_relays_fail_verification() {
    let bus = SimBus::new().with_card(0, 3);
    bus.card(0, |c| c.stuck_relays = true);
    let mut board = Board::init(bus.clone(), 0).unwrap().with_retries(4);

    let before = bus.transactions();
    assert!(matches!(
        board.relays_write_verified(0x01),
        Err(Error::VerifyFailed(4))
    ));
    // one write and one read-back per attempt
    assert_eq!(bus.transactions() - before, 8);
}

#[test]
fn staged_pulses_run_only_after_execute() {
    let bus = SimBus::new().with_card(0, 3);
    let mut board = Board::init(bus.clone(), 0).unwrap();

    board.od_pulses_save(1, 300).unwrap();
    board.od_pulses_save(3, 700).unwrap();
    assert_eq!(board.od_pulses_get(1).unwrap(), 0);
    assert_eq!(board.od_pulses_get(3).unwrap(), 0);

    board.od_pulses_exec(3).unwrap();
    assert_eq!(board.od_pulses_get(1).unwrap(), 0);
    assert_eq!(board.od_pulses_get(3).unwrap(), 700);

    board.od_pulses_exec(1).unwrap();
    assert_eq!(board.od_pulses_get(1).unwrap(), 300);
}

#[test]
fn edge_modes() {
    let bus = SimBus::new().with_card(0, 3);
    let mut board = Board::init(bus.clone(), 0).unwrap();

    board.opto_edge_set(1, EdgeMode::Rising).unwrap();
    board.opto_edge_set(2, EdgeMode::Both).unwrap();
    board.opto_edge_set(2, EdgeMode::Falling).unwrap();

    assert_eq!(board.opto_edge_get(1).unwrap(), EdgeMode::Rising);
    assert_eq!(board.opto_edge_get(2).unwrap(), EdgeMode::Falling);
    assert_eq!(board.opto_edge_get(3).unwrap(), EdgeMode::None);
    assert_eq!(bus.reg(0, 0x04), 0x01);
    assert_eq!(bus.reg(0, 0x05), 0x02);
}

#[test]
fn pwm_is_clamped_by_the_board() {
    let bus = SimBus::new().with_card(0, 3);
    let mut board = Board::init(bus.clone(), 0).unwrap();

    board.od_pwm_set(2, 150.0).unwrap();
    assert_eq!(board.od_pwm_get(2).unwrap(), 100.0);
    board.od_pwm_set(2, -3.0).unwrap();
    assert_eq!(board.od_pwm_get(2).unwrap(), 0.0);

    board.pwm_freq_set(5).unwrap();
    assert_eq!(board.pwm_freq_get().unwrap(), 10);
    board.pwm_freq_set(100_000).unwrap();
    assert_eq!(board.pwm_freq_get().unwrap(), 65500);
}

#[test]
fn old_hardware_gate() {
    let bus = SimBus::new().with_card(0, 2);
    let mut board = Board::init(bus.clone(), 0).unwrap();
    let profile = MoveProfile::new(100, 100, 10, 1000).unwrap();

    let before = bus.transactions();
    assert!(matches!(
        board.pwm_ch_freq_set(1, 500),
        Err(Error::Unsupported { required: 3, found: 2 })
    ));
    assert!(matches!(
        board.od_profile_set(1, &profile),
        Err(Error::Unsupported { .. })
    ));
    assert!(board.pwm_freq_get().is_err());
    assert_eq!(bus.transactions(), before);
}

#[test]
fn list_finds_only_plugged_cards() {
    let mut bus = SimBus::new().with_card(1, 3).with_card(6, 3);

    let found: Vec<i64> = (0..8).filter(|&s| Board::is_present(&mut bus, s)).collect();
    assert_eq!(found, [1, 6]);
}
