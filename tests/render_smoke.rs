use kurbo::Affine;
use scrubline::{
    CommandList, PixmapSurface, RawCommand, RenderOptions, ValidationMode, compile, compile_raw,
    render,
};

#[derive(Debug, serde::Deserialize)]
struct ProgramFile {
    #[allow(dead_code)]
    title: Option<String>,
    commands: Vec<RawCommand>,
}

#[test]
fn demo_program_rasterizes_to_pixels() {
    let s = include_str!("data/demo_program.json");
    let program: ProgramFile = serde_json::from_str(s).unwrap();
    let timeline = compile_raw(&program.commands, ValidationMode::Strict).unwrap();

    let base = Affine::translate((64.0, 64.0));
    let mut surface = PixmapSurface::new(128, 128).with_base(base);
    let out = render(&timeline, &mut surface, timeline.len() as f64, &RenderOptions::default())
        .unwrap();
    assert!(!out.trace.is_empty());

    let frame = surface.finish();
    assert_eq!(frame.data.len(), 128 * 128 * 4);
    assert!(frame.premultiplied);
    assert!(frame.data.iter().any(|&b| b != 0));
}

#[test]
fn empty_list_rasterizes_to_nothing() {
    let timeline = compile(&CommandList::default());
    let mut surface = PixmapSurface::new(32, 32);
    render(&timeline, &mut surface, 0.0, &RenderOptions::default()).unwrap();
    let frame = surface.finish();
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn zero_progress_draws_no_pixels() {
    let s = include_str!("data/demo_program.json");
    let program: ProgramFile = serde_json::from_str(s).unwrap();
    let timeline = compile_raw(&program.commands, ValidationMode::Strict).unwrap();

    let mut surface = PixmapSurface::new(64, 64).with_base(Affine::translate((32.0, 32.0)));
    render(&timeline, &mut surface, 0.0, &RenderOptions::default()).unwrap();
    let frame = surface.finish();
    assert!(frame.data.iter().all(|&b| b == 0));
}
