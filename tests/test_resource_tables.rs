use pixel_canvas::{Canvas, CanvasConfig, CanvasError, FilterMode, WrapMode, SHAPES_MAX, TEXTURES_MAX};

fn canvas() -> Canvas {
    Canvas::new_headless(CanvasConfig::new("resources", 64, 64, 64, 64)).unwrap()
}

#[test]
fn test_texture_table_round_trip_has_no_leak() {
    let mut c = canvas();
    let mut handles = Vec::new();
    for _ in 0..TEXTURES_MAX {
        handles.push(
            c.create_texture(1, 1, FilterMode::Nearest, WrapMode::Clamp, vec![0; 4])
                .unwrap(),
        );
    }
    assert_eq!(c.texture_count(), TEXTURES_MAX);

    // table is full: the next create must fail loudly, not overflow
    assert!(matches!(
        c.create_texture(1, 1, FilterMode::Nearest, WrapMode::Clamp, vec![0; 4]),
        Err(CanvasError::Exhausted(_))
    ));

    for h in handles {
        c.destroy_texture(h).unwrap();
    }
    assert_eq!(c.texture_count(), 0);

    // exactly the same number of allocations succeeds again
    for _ in 0..TEXTURES_MAX {
        c.create_texture(1, 1, FilterMode::Nearest, WrapMode::Clamp, vec![0; 4])
            .unwrap();
    }
    assert!(matches!(
        c.create_texture(1, 1, FilterMode::Nearest, WrapMode::Clamp, vec![0; 4]),
        Err(CanvasError::Exhausted(_))
    ));
}

#[test]
fn test_shape_table_exhaustion_is_defined() {
    let mut c = canvas();
    let tri = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
    for _ in 0..SHAPES_MAX {
        c.compile_shape(&tri).unwrap();
    }
    assert!(matches!(
        c.compile_shape(&tri),
        Err(CanvasError::Exhausted(_))
    ));
}

#[test]
fn test_destroyed_handle_is_stale_even_after_reuse() {
    let mut c = canvas();
    let a = c
        .create_texture(1, 1, FilterMode::Nearest, WrapMode::Clamp, vec![9; 4])
        .unwrap();
    c.destroy_texture(a).unwrap();

    // the slot gets recycled by the next create
    let b = c
        .create_texture(1, 1, FilterMode::Nearest, WrapMode::Clamp, vec![7; 4])
        .unwrap();

    assert!(matches!(c.texture_data(a), Err(CanvasError::StaleHandle)));
    assert!(matches!(c.use_texture(a), Err(CanvasError::StaleHandle)));
    assert!(matches!(c.destroy_texture(a), Err(CanvasError::StaleHandle)));

    // the live handle is untouched by all of that
    assert_eq!(c.texture_data(b).unwrap(), vec![7; 4]);
    assert_eq!(c.texture_count(), 1);
}

#[test]
fn test_draw_calls_reject_stale_handles() {
    let mut c = canvas();
    let shape = c.compile_shape(&[0.0, 0.0, 4.0, 0.0, 0.0, 4.0]).unwrap();
    c.destroy_shape(shape).unwrap();
    assert!(matches!(
        c.draw_shape(shape, 0.0, 0.0, 0.0, 1.0),
        Err(CanvasError::StaleHandle)
    ));
}
