use kurbo::Affine;
use scrubline::{
    Command, CommandList, Direction, RecordedOp, RecordingSurface, RenderOptions, Rgba8,
    ScrublineError, StackKind, compile, render,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn affine_close(a: Affine, b: Affine) {
    let (ac, bc) = (a.as_coeffs(), b.as_coeffs());
    for i in 0..6 {
        assert!((ac[i] - bc[i]).abs() < 1e-9, "coeff {i}: {ac:?} vs {bc:?}");
    }
}

#[test]
fn scenario_translate_rotate_scale_at_one_and_a_half() {
    init_tracing();
    let list = CommandList::from_commands([
        Command::Translate { tx: 10.0, ty: 0.0 },
        Command::Rotate { angle_deg: 90.0 },
        Command::Scale { sx: 2.0, sy: 2.0 },
    ]);
    let tl = compile(&list);
    let mut surface = RecordingSurface::new();
    let out = render(&tl, &mut surface, 1.5, &RenderOptions::default()).unwrap();

    affine_close(tl.step(0).unwrap().matrix, Affine::translate((10.0, 0.0)));
    affine_close(
        out.current_frame,
        Affine::translate((10.0, 0.0)) * Affine::rotate(45f64.to_radians()),
    );
    // Scale has zero progress.
    assert_eq!(tl.step(2).unwrap().step_matrix(0.0), Affine::IDENTITY);
}

#[test]
fn scenario_save_restore_cancels_translation() {
    init_tracing();
    let list = CommandList::from_commands([
        Command::Save,
        Command::Translate { tx: 5.0, ty: 5.0 },
        Command::Restore,
        Command::FillRect {
            x: 0.0,
            y: 0.0,
            w: 10.0,
            h: 10.0,
            color: Some(Rgba8::opaque(255, 0, 0)),
        },
    ]);
    let tl = compile(&list);
    assert_eq!(tl.step(3).unwrap().matrix, Affine::IDENTITY);

    let mut surface = RecordingSurface::new();
    render(&tl, &mut surface, 4.0, &RenderOptions::default()).unwrap();
    let RecordedOp::Fill { transform, .. } = &surface.ops[0] else {
        panic!("expected a fill");
    };
    assert_eq!(*transform, Affine::IDENTITY);
}

#[test]
fn scenario_lone_restore_warns_and_still_renders() {
    init_tracing();
    let list = CommandList::from_commands([Command::Restore]);
    let tl = compile(&list);
    let stacks: Vec<StackKind> = tl.warnings().iter().map(|w| w.stack).collect();
    assert!(stacks.contains(&StackKind::Matrix));
    assert!(stacks.contains(&StackKind::Fill));
    assert!(stacks.contains(&StackKind::Stroke));
    assert_eq!(tl.step(0).unwrap().matrix, Affine::IDENTITY);

    let mut surface = RecordingSurface::new();
    let out = render(&tl, &mut surface, 1.0, &RenderOptions::default()).unwrap();
    assert!(out.trace.contains("restore();"));
}

#[test]
fn balanced_save_restore_pairs_have_identity_net_effect() {
    init_tracing();
    let mut commands = Vec::new();
    for _ in 0..4 {
        commands.push(Command::Save);
    }
    for _ in 0..4 {
        commands.push(Command::Restore);
    }
    let tl = compile(&CommandList::from_commands(commands));
    assert!(tl.warnings().is_empty());
    assert_eq!(tl.steps().last().unwrap().matrix, Affine::IDENTITY);
}

#[test]
fn backward_playback_of_stack_lists_is_refused() {
    init_tracing();
    let list = CommandList::from_commands([Command::Save, Command::Restore]);
    let tl = compile(&list);
    assert!(!tl.supports_backward());

    let mut surface = RecordingSurface::new();
    let options = RenderOptions {
        direction: Direction::Backward,
        ..RenderOptions::default()
    };
    let err = render(&tl, &mut surface, 0.0, &options).unwrap_err();
    assert!(matches!(err, ScrublineError::Mode(_)));
    // Nothing was drawn on the failed render.
    assert!(surface.ops.is_empty());
}

#[test]
fn compile_is_deterministic_across_runs() {
    init_tracing();
    let list = CommandList::from_commands([
        Command::Translate { tx: 0.1, ty: 0.2 },
        Command::Rotate { angle_deg: 13.7 },
        Command::Shear { shx: 0.25, shy: -0.5 },
        Command::Transform { a: 1.0, b: 0.5, c: -0.5, d: 1.0, e: 2.0, f: 3.0 },
        Command::StrokeRect { x: -5.0, y: -5.0, w: 10.0, h: 10.0, color: None },
    ]);
    assert_eq!(compile(&list), compile(&list));
}

#[test]
fn two_players_can_share_one_timeline() {
    init_tracing();
    let list = CommandList::from_commands([
        Command::Translate { tx: 10.0, ty: 0.0 },
        Command::FillRect { x: 0.0, y: 0.0, w: 5.0, h: 5.0, color: None },
    ]);
    let tl = compile(&list);

    let mut a = RecordingSurface::new();
    let mut b = RecordingSurface::new();
    let out_a = render(&tl, &mut a, 2.0, &RenderOptions::default()).unwrap();
    let out_b = render(&tl, &mut b, 0.5, &RenderOptions::default()).unwrap();
    assert_eq!(a.ops.len(), 1);
    assert!(b.ops.is_empty());
    affine_close(out_a.current_frame, Affine::translate((10.0, 0.0)));
    affine_close(out_b.current_frame, Affine::translate((5.0, 0.0)));
}
