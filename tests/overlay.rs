use cairo::{Context, ImageSurface};
use floormark::Config;
use floormark::input::{InteractionState, PointerButton, ToolMode};
use floormark::util::Size;

fn surface_with_context(width: i32, height: i32) -> (ImageSurface, Context) {
    let surface = ImageSurface::create(cairo::Format::ARgb32, width, height).unwrap();
    let ctx = Context::new(&surface).unwrap();
    (surface, ctx)
}

fn pixel_alpha(surface: &mut ImageSurface, x: usize, y: usize) -> u8 {
    surface.flush();
    let stride = surface.stride() as usize;
    let data = surface.data().unwrap();
    // ARGB32 is native-endian; alpha is the high byte of the u32
    let offset = y * stride + x * 4;
    let pixel = u32::from_ne_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ]);
    (pixel >> 24) as u8
}

fn state() -> InteractionState {
    InteractionState::new(
        Size::new(400.0, 200.0),
        Size::new(400.0, 200.0),
        &Config::default(),
    )
}

#[test]
fn overlay_draws_placed_marker() {
    let mut state = state();
    state.select_tool(ToolMode::Add);
    state.on_pointer_down(PointerButton::Primary, 200.0, 100.0).unwrap();
    state.on_pointer_up(PointerButton::Primary, 200.0, 100.0).unwrap();
    state.confirm_editor().unwrap();

    let (mut surface, ctx) = surface_with_context(400, 200);
    state.render_overlay(&ctx).unwrap();
    drop(ctx);

    assert!(pixel_alpha(&mut surface, 200, 100) > 0);
    assert_eq!(pixel_alpha(&mut surface, 5, 5), 0);
}

#[test]
fn overlay_follows_the_viewport() {
    let mut state = state();
    state.select_tool(ToolMode::Add);
    state.on_pointer_down(PointerButton::Primary, 100.0, 50.0).unwrap();
    state.on_pointer_up(PointerButton::Primary, 100.0, 50.0).unwrap();
    state.confirm_editor().unwrap();

    // Pan the view right by 100 px; the marker moves with it
    state.on_pointer_down(PointerButton::Primary, 10.0, 190.0).unwrap();
    state.on_pointer_move(110.0, 190.0).unwrap();
    state.on_pointer_up(PointerButton::Primary, 110.0, 190.0).unwrap();

    let (mut surface, ctx) = surface_with_context(400, 200);
    state.render_overlay(&ctx).unwrap();
    drop(ctx);

    assert!(pixel_alpha(&mut surface, 200, 50) > 0);
    assert_eq!(pixel_alpha(&mut surface, 100, 50), 0);
}

#[test]
fn provisional_region_is_drawn_while_dragging() {
    let mut state = state();
    state.select_tool(ToolMode::Region);
    state.on_pointer_down(PointerButton::Primary, 20.0, 20.0).unwrap();
    state.on_pointer_move(120.0, 80.0).unwrap();

    let (mut surface, ctx) = surface_with_context(400, 200);
    state.render_overlay(&ctx).unwrap();
    drop(ctx);

    assert!(pixel_alpha(&mut surface, 70, 50) > 0);
    assert!(state.model().regions().is_empty());
}
