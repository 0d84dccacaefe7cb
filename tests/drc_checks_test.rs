// End-to-end rule check runs against small hand-built boards
use board_drc::board::{
    Board, Hole, NetLine, NetLineAnchor, NetPoint, NetSegment, NetSignal, NetSignalId, Plane, Via, TOP_COPPER,
};
use board_drc::drc::{AllowedSlots, BoardDesignRuleCheck, DrcEvent, DrcMessageKind, DrcReport, DrcSettings, Violation};
use board_drc::geometry::{Length, Path, Point, PositiveLength, UnsignedLength};

fn pl(nm: i64) -> PositiveLength {
    PositiveLength::new(Length(nm)).unwrap()
}

/// Horizontal 5mm trace on the top layer at height `y`
fn trace(id: u64, net: Option<u64>, y: i64, width: i64) -> NetSegment {
    NetSegment {
        id,
        net_signal: net.map(NetSignalId),
        net_points: vec![
            NetPoint { id: id * 10 + 1, position: Point::nm(0, y) },
            NetPoint { id: id * 10 + 2, position: Point::nm(5_000_000, y) },
        ],
        net_lines: vec![NetLine {
            id: id * 10,
            start: NetLineAnchor::NetPoint { id: id * 10 + 1 },
            end: NetLineAnchor::NetPoint { id: id * 10 + 2 },
            layer: TOP_COPPER.into(),
            width: pl(width),
        }],
        ..Default::default()
    }
}

fn nets(ids: &[u64]) -> Vec<NetSignal> {
    ids.iter()
        .map(|&id| NetSignal { id: NetSignalId(id), name: format!("N{}", id) })
        .collect()
}

fn clearance_only(nm: u32) -> DrcSettings {
    DrcSettings {
        min_copper_copper_clearance: UnsignedLength::from_nm(nm),
        ..DrcSettings::disabled()
    }
}

fn run(board: &mut Board, settings: DrcSettings, quick: bool) -> DrcReport {
    BoardDesignRuleCheck::new(settings, quick).execute(board).unwrap()
}

fn count(report: &DrcReport, kind: DrcMessageKind) -> usize {
    report.messages.iter().filter(|m| m.kind() == kind).count()
}

#[test]
fn test_two_close_traces_reported_once() {
    // 100um wide traces, centres 150um apart: 50um gap
    let mut board = Board {
        net_signals: nets(&[1, 2]),
        net_segments: vec![trace(1, Some(1), 0, 100_000), trace(2, Some(2), 150_000, 100_000)],
        ..Default::default()
    };
    let report = run(&mut board, clearance_only(200_000), false);

    assert_eq!(report.messages.len(), 1, "{:?}", report.messages);
    let message = &report.messages[0];
    assert_eq!(message.kind(), DrcMessageKind::CopperCopperClearance);
    assert!(message.message().contains("0.2mm"), "{}", message.message());

    // Location lies in the band between the two traces
    assert!(!message.locations.is_empty());
    for location in &message.locations {
        for v in location.vertices() {
            assert!(v.pos.y.to_nm() > -150_000 && v.pos.y.to_nm() < 300_000, "{:?}", v.pos);
        }
    }
}

#[test]
fn test_far_traces_pass() {
    let mut board = Board {
        net_signals: nets(&[1, 2]),
        net_segments: vec![trace(1, Some(1), 0, 100_000), trace(2, Some(2), 500_000, 100_000)],
        ..Default::default()
    };
    assert!(run(&mut board, clearance_only(200_000), false).messages.is_empty());
}

#[test]
fn test_same_net_is_exempt() {
    let mut board = Board {
        net_signals: nets(&[1]),
        net_segments: vec![trace(1, Some(1), 0, 100_000), trace(2, Some(1), 150_000, 100_000)],
        ..Default::default()
    };
    let report = run(&mut board, clearance_only(200_000), true);
    assert_eq!(count(&report, DrcMessageKind::CopperCopperClearance), 0);
}

#[test]
fn test_netless_items_are_checked() {
    let mut board = Board {
        net_segments: vec![trace(1, None, 0, 100_000), trace(2, None, 150_000, 100_000)],
        ..Default::default()
    };
    let report = run(&mut board, clearance_only(200_000), true);
    assert_eq!(count(&report, DrcMessageKind::CopperCopperClearance), 1);
}

#[test]
fn test_disabled_thresholds_report_nothing() {
    // Thin, crowded traces, a tiny via and a tiny hole: all off with zero thresholds
    let mut first = trace(1, Some(1), 0, 10_000);
    first.vias.push(Via {
        id: 1,
        position: Point::nm(8_000_000, 0),
        size: pl(150_000),
        drill_diameter: pl(100_000),
    });
    first.net_lines.push(NetLine {
        id: 2,
        start: NetLineAnchor::NetPoint { id: 12 },
        end: NetLineAnchor::Via { id: 1 },
        layer: TOP_COPPER.into(),
        width: pl(10_000),
    });
    let mut board = Board {
        net_signals: nets(&[1, 2]),
        net_segments: vec![first, trace(2, Some(2), 20_000, 10_000)],
        holes: vec![Hole::round(1, Point::nm(9_000_000, 0), pl(50_000))],
        ..Default::default()
    };

    let report = run(&mut board, DrcSettings::disabled(), false);
    assert!(report.messages.is_empty(), "{:?}", report.messages);
    assert_eq!(report.progress, 100);
}

#[test]
fn test_quick_run_subset_and_no_plane_refill() {
    let plane = Plane {
        id: 1,
        layer: TOP_COPPER.into(),
        net_signal: NetSignalId(3),
        outline: Path::from_points(&[
            Point::nm(20_000_000, 0),
            Point::nm(25_000_000, 0),
            Point::nm(25_000_000, 5_000_000),
            Point::nm(20_000_000, 5_000_000),
        ]),
        // Exactly the default minimum: the plane itself passes
        min_width: UnsignedLength::from_nm(200_000),
        fragments: Vec::new(),
    };
    let make_board = || Board {
        net_signals: nets(&[1, 3]),
        net_segments: vec![
            trace(1, Some(1), 0, 100_000),
            // Stale: no vias, no net lines
            NetSegment { id: 2, net_signal: Some(NetSignalId(1)), ..Default::default() },
        ],
        planes: vec![plane.clone()],
        ..Default::default()
    };

    let mut quick_board = make_board();
    let quick = run(&mut quick_board, DrcSettings::default(), true);
    assert!(quick.messages.iter().all(|m| m.kind().is_quick_check()));
    assert_eq!(count(&quick, DrcMessageKind::MinimumWidth), 1);
    assert!(quick_board.planes[0].fragments.is_empty());
    assert!(!quick.status.iter().any(|s| s.contains("planes")));

    let mut full_board = make_board();
    let full = run(&mut full_board, DrcSettings::default(), false);
    assert_eq!(count(&full, DrcMessageKind::MinimumWidth), 1);
    assert_eq!(count(&full, DrcMessageKind::EmptyNetSegment), 1);
    assert_eq!(full_board.planes[0].fragments.len(), 1);

    // Quick messages are a subset of the full run's
    for message in &quick.messages {
        assert!(full.messages.contains(message), "{:?}", message);
    }
    assert!(full.messages.len() > quick.messages.len());
}

#[test]
fn test_via_with_thin_ring() {
    let mut board = Board {
        net_segments: vec![NetSegment {
            id: 1,
            vias: vec![Via {
                id: 7,
                position: Point::nm(1_000_000, 1_000_000),
                size: pl(600_000),
                drill_diameter: pl(300_000),
            }],
            ..Default::default()
        }],
        ..Default::default()
    };
    let settings = DrcSettings {
        min_pth_annular_ring: UnsignedLength::from_nm(200_000),
        ..DrcSettings::disabled()
    };
    let report = run(&mut board, settings, false);
    assert_eq!(report.messages.len(), 1);
    match &report.messages[0].violation {
        Violation::MinimumAnnularRing { annular_width, .. } => assert_eq!(annular_width.get().to_nm(), 200_000),
        other => panic!("unexpected violation {:?}", other),
    }
    assert!(report.messages[0].message().contains("via"));
}

#[test]
fn test_forbidden_npth_slots() {
    let multi = Hole {
        id: 1,
        diameter: pl(1_000_000),
        path: Path::from_points(&[Point::nm(0, 0), Point::nm(3_000_000, 0), Point::nm(3_000_000, 3_000_000)]),
    };
    let single = Hole {
        id: 2,
        diameter: pl(1_000_000),
        path: Path::line(Point::nm(10_000_000, 0), Point::nm(13_000_000, 0)),
    };
    let settings = DrcSettings {
        allowed_npth_slots: AllowedSlots::SingleSegmentStraight,
        ..DrcSettings::disabled()
    };

    let mut board = Board { holes: vec![multi], ..Default::default() };
    let report = run(&mut board, settings.clone(), false);
    assert_eq!(count(&report, DrcMessageKind::ForbiddenSlot), 1);

    let mut board = Board { holes: vec![single], ..Default::default() };
    let report = run(&mut board, settings, false);
    assert_eq!(count(&report, DrcMessageKind::ForbiddenSlot), 0);
}

#[test]
fn test_progress_checkpoints() {
    let mut board = Board {
        net_signals: nets(&[1]),
        net_segments: vec![trace(1, Some(1), 0, 250_000)],
        ..Default::default()
    };
    let mut percents = Vec::new();
    let mut finished = None;
    BoardDesignRuleCheck::new(DrcSettings::default(), false)
        .with_observer(|e: &DrcEvent| match e {
            DrcEvent::Progress { percent } => percents.push(*percent),
            DrcEvent::Finished { message_count } => finished = Some(*message_count),
            _ => {}
        })
        .execute(&mut board)
        .unwrap();

    assert_eq!(percents.first(), Some(&2));
    assert_eq!(percents.last(), Some(&100));
    assert!(percents.contains(&12));
    assert!(percents.windows(2).all(|w| w[0] <= w[1]), "{:?}", percents);
    assert_eq!(finished, Some(0));
}
