use floem_swatches::{
    ColorDrag, ColorPickerArgs, ColorThemeStore, ConfigStore, DragSource, DropOutcome,
    DropTarget, FileConfig, Hsv, LinearColor, PickerContext, PickerSettings,
};

fn open(dir: &tempfile::TempDir) -> FileConfig {
    FileConfig::open(dir.path().join("color_picker.toml")).unwrap()
}

#[test]
fn theme_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let red = Hsv::new(0.0, 1.0, 1.0, 1.0).to_linear();

    let mut store = ColorThemeStore::load(open(&dir));
    let palette = store.create_theme("Palette", []);
    store.insert_color(palette, red, 0).unwrap();
    store.set_current_theme(palette).unwrap();
    drop(store);

    let store = ColorThemeStore::load(open(&dir));
    let names: Vec<_> = store.themes().iter().map(|t| t.name().to_string()).collect();
    assert_eq!(names, ["New Theme", "Palette"]);
    let palette = store.theme_by_name("Palette").unwrap();
    assert_eq!(store.current_theme().id(), palette.id());
    assert_eq!(palette.len(), 1);
    assert!(palette.swatches()[0].color.equals_within(&red, 1e-3));
}

#[test]
fn settings_and_themes_share_one_file() {
    let dir = tempfile::tempdir().unwrap();

    let mut ctx = PickerContext::new(open(&dir));
    ctx.update_settings(|s| {
        s.wheel_mode = true;
        s.srgb_enabled = false;
    });
    let theme = ctx.themes().current_theme().id();
    ctx.themes_mut()
        .insert_color(theme, LinearColor::new(0.5, 0.5, 0.5, 1.0), 0)
        .unwrap();
    drop(ctx);

    let config = open(&dir);
    assert!(config.exists());
    assert_eq!(config.get("ColorThemes", "Theme0Color0").as_deref(), Some("0.5 0.5 0.5 1"));
    let ctx = PickerContext::new(config);
    assert_eq!(
        ctx.settings(),
        PickerSettings {
            wheel_mode: true,
            advanced_section_expanded: false,
            srgb_enabled: false,
        }
    );
    assert_eq!(ctx.themes().current_theme().len(), 1);
}

#[test]
fn color_moves_between_themes_by_drag() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ColorThemeStore::load(open(&dir));
    let colors: Vec<_> = (0..4)
        .map(|i| LinearColor::new(i as f64 / 4.0, 0.0, 0.0, 1.0))
        .collect();
    let a = store.create_theme("A", colors.clone());
    let b = store.create_theme("B", [LinearColor::WHITE]);

    let mut drag = ColorDrag::new();
    drag.press(DragSource::ThemeSlot { theme: a, index: 2 }, (10.0, 10.0), true, true);
    assert!(!drag.motion((12.0, 10.0), &mut store));
    assert!(drag.motion((40.0, 10.0), &mut store));
    assert_eq!(store.theme(a).unwrap().len(), 3);

    assert_eq!(drag.hover(Some((b, 3.0, 16.0)), &store), Some(0));
    let outcome = drag.drop_on(
        DropTarget::ThemeBar {
            theme: b,
            local_x: 3.0,
            slot_width: 16.0,
        },
        &mut store,
    );
    assert!(matches!(outcome, Some(DropOutcome::Inserted { index: 0, .. })));

    let reloaded = ColorThemeStore::load(open(&dir));
    let a = reloaded.theme_by_name("A").unwrap();
    let b = reloaded.theme_by_name("B").unwrap();
    let a_colors: Vec<_> = a.colors().collect();
    assert_eq!(a_colors, [colors[0], colors[1], colors[3]]);
    let b_colors: Vec<_> = b.colors().collect();
    assert_eq!(b_colors, [colors[2], LinearColor::WHITE]);
}

#[test]
fn picked_color_lands_in_theme() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = PickerContext::new(open(&dir));
    ctx.open_picker(ColorPickerArgs {
        initial: LinearColor::new(0.0, 0.0, 1.0, 0.25),
        use_alpha: false,
    });
    let picker = ctx.picker_mut().unwrap();
    assert_eq!(picker.hex_text(), "0000FF");
    assert!(picker.apply_hex_text("#FF8000"));
    let payload = picker.drag_payload();

    let mut drag = ColorDrag::new();
    drag.press(DragSource::Swatch { hsv: payload.hsv }, (0.0, 0.0), false, true);
    assert!(drag.motion((0.0, 20.0), ctx.themes_mut()));
    let theme = ctx.themes().current_theme().id();
    let outcome = drag.drop_on(
        DropTarget::ThemeBar {
            theme,
            local_x: 100.0,
            slot_width: 16.0,
        },
        ctx.themes_mut(),
    );
    assert!(matches!(outcome, Some(DropOutcome::Inserted { index: 0, .. })));

    let stored = ctx.themes().current_theme().swatches()[0].color;
    assert_eq!(stored.a, 1.0);
    assert_eq!(stored.to_hex_rgb(true), "FF8000");
    assert_eq!(ctx.close_picker(false).map(|c| c.a), Some(0.25));
}
