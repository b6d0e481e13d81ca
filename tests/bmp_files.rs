//! File-level behavior: saving, reloading, and the startup error policy.

use std::fs;

use pixelpad::canvas::{BLOCK_SIZE, BlockSize, Canvas};
use pixelpad::color::Color;
use pixelpad::io::{BmpFile, CanvasIoError, CanvasStore, encode_bmp, load_canvas, save_canvas};
use pixelpad::persistence::TickOutcome;
use pixelpad::project::{EditorState, TickEvent};

#[test]
fn saved_canvas_loads_back_identically() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("art.bmp");
    let block = BlockSize::new(8, 8);

    let mut canvas = Canvas::new(2, 2);
    canvas.paint(0, 0, Color::BLACK);
    save_canvas(&path, &canvas, block).unwrap();

    let loaded = load_canvas(&path, block).unwrap().expect("file was just written");
    assert_eq!(loaded, canvas);
    assert_eq!(loaded.get(0, 0), Color::BLACK);
    assert_eq!(loaded.get(1, 0), Color::WHITE);
    assert_eq!(loaded.get(0, 1), Color::WHITE);
    assert_eq!(loaded.get(1, 1), Color::WHITE);

    // No temporary file is left behind.
    let names: Vec<_> = fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
    assert_eq!(names, vec![std::ffi::OsString::from("art.bmp")]);
}

#[test]
fn saved_bitmap_has_the_expanded_dimensions() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("wide.bmp");
    save_canvas(&path, &Canvas::new(3, 2), BlockSize::new(4, 5)).unwrap();

    let bytes = fs::read(&path).unwrap();
    let width = i32::from_le_bytes(bytes[18..22].try_into().unwrap());
    let height = i32::from_le_bytes(bytes[22..26].try_into().unwrap());
    let bits_per_pixel = u16::from_le_bytes(bytes[28..30].try_into().unwrap());
    assert_eq!(width, 12);
    assert_eq!(height.abs(), 10);
    assert_eq!(bits_per_pixel, 32);
}

#[test]
fn missing_file_means_no_canvas() {
    let dir = tempfile::tempdir().expect("temp dir");
    let loaded = load_canvas(&dir.path().join("nope.bmp"), BLOCK_SIZE).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn corrupt_file_is_an_error_not_a_blank_canvas() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("broken.bmp");
    fs::write(&path, b"BM this is not really a bitmap").unwrap();
    assert!(load_canvas(&path, BLOCK_SIZE).is_err());
    // The user's file is untouched.
    assert_eq!(fs::read(&path).unwrap(), b"BM this is not really a bitmap");
}

#[test]
fn directory_in_place_of_a_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("folder.bmp");
    fs::create_dir_all(&path).unwrap();
    assert!(load_canvas(&path, BLOCK_SIZE).is_err());
}

#[test]
fn tiny_image_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("tiny.bmp");
    // 1x1 canvas with 1x1 blocks is smaller than one 8x8 block.
    fs::write(&path, encode_bmp(&Canvas::new(1, 1), BlockSize::new(1, 1)).unwrap()).unwrap();
    let err = load_canvas(&path, BlockSize::new(8, 8)).unwrap_err();
    assert!(matches!(err, CanvasIoError::TooSmall { .. }));
}

#[test]
fn odd_sized_image_still_loads() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("odd.bmp");
    // 3x3 cells at 3x3 blocks = 9x9 pixels; read back with 4x4 blocks → 2x2 cells
    fs::write(&path, encode_bmp(&Canvas::new(3, 3), BlockSize::new(3, 3)).unwrap()).unwrap();
    let canvas = load_canvas(&path, BlockSize::new(4, 4)).unwrap().unwrap();
    assert_eq!((canvas.width(), canvas.height()), (2, 2));
}

#[test]
fn editor_autosaves_to_disk_after_the_debounce() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("session.bmp");
    let store = BmpFile::new(path.clone());
    let loaded = store.load().unwrap();
    let mut editor = EditorState::open(store, loaded, BLOCK_SIZE, 4, 3);

    editor.paint_cell(3, 2, Color::BLACK);
    assert_eq!(editor.handle_tick(TickEvent { elapsed_seconds: 0.1 }), TickOutcome::Pending);
    assert!(!path.exists());
    assert_eq!(editor.handle_tick(TickEvent { elapsed_seconds: 0.25 }), TickOutcome::Flushed);

    let reopened = BmpFile::new(path).load().unwrap().unwrap();
    assert_eq!(&reopened, editor.canvas());
    assert_eq!(reopened.get(3, 2), Color::BLACK);
}

#[test]
fn unwritable_target_keeps_the_editor_dirty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("missing_subdir").join("art.bmp");
    let mut editor = EditorState::open(BmpFile::new(path.clone()), None, BLOCK_SIZE, 2, 2);

    editor.paint_cell(0, 0, Color::BLACK);
    assert_eq!(editor.handle_tick(TickEvent { elapsed_seconds: 1.0 }), TickOutcome::FlushFailed);
    assert!(editor.is_dirty());

    // Painting keeps working; once the directory appears the retry succeeds.
    editor.paint_cell(1, 1, Color::BLACK);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    assert_eq!(editor.handle_tick(TickEvent { elapsed_seconds: 0.016 }), TickOutcome::Flushed);
    let saved = load_canvas(&path, BLOCK_SIZE).unwrap().unwrap();
    assert_eq!(saved.get(1, 1), Color::BLACK);
}

#[test]
fn a_second_of_failed_saves_logs_only_once() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("gone").join("art.bmp");
    let mut editor = EditorState::open(BmpFile::new(path), None, BLOCK_SIZE, 2, 2);

    editor.paint_cell(0, 0, Color::BLACK);
    assert_eq!(editor.handle_tick(TickEvent { elapsed_seconds: 0.5 }), TickOutcome::FlushFailed);
    for _ in 0..58 {
        let outcome = editor.handle_tick(TickEvent { elapsed_seconds: 1.0 / 60.0 });
        assert_eq!(outcome, TickOutcome::FlushFailed);
    }
    assert_eq!(editor.persistence().consecutive_failures(), 59);
    assert_eq!(editor.persistence().failure_warnings(), 1);
}

#[test]
fn store_save_writes_through_the_trait() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = BmpFile::with_block(dir.path().join("t.bmp"), BlockSize::new(2, 2));
    store.save(&Canvas::filled(2, 2, Color::BLACK)).unwrap();
    let back = store.load().unwrap().unwrap();
    assert_eq!(back, Canvas::filled(2, 2, Color::BLACK));
}
