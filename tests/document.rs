//! End-to-end properties of the document model: background protection,
//! history round trips, and duplicate independence across the public API.

use rasterlab::document::Document;
use rasterlab::layer::LayerKind;
use rasterlab::raster::color::{BLUE, RED, WHITE};
use rasterlab::tool::{GestureEvent, ToolKind};

fn paint_stroke(doc: &mut Document, from: (i32, i32), to: (i32, i32)) {
    doc.pointer_event(GestureEvent::start(from.0, from.1)).unwrap();
    doc.pointer_event(GestureEvent::moved((from.0 + to.0) / 2, (from.1 + to.1) / 2))
        .unwrap();
    doc.pointer_event(GestureEvent::end(to.0, to.1)).unwrap();
}

#[test]
fn background_survives_any_structural_sequence() {
    let mut doc = Document::new(16, 16, 20).unwrap();
    let stack = doc.stack_mut();

    stack.create_layer(Some("A"));
    stack.create_layer(Some("B"));
    stack.create_layer(Some("C"));
    stack.move_layer(1, 3);
    stack.move_layer(3, 1);
    stack.move_layer(0, 2); // background refuses to move
    stack.delete_layer(Some(2));
    stack.duplicate_layer(Some(1));
    stack.delete_layer(Some(0)); // background refuses to die
    stack.delete_layer(Some(1));
    stack.delete_layer(Some(1));
    stack.delete_layer(Some(1));

    assert!(stack.len() >= 1);
    assert_eq!(stack.layer(0).unwrap().kind(), LayerKind::Background);
    assert!(stack.active_index() < stack.len());
}

#[test]
fn undo_redo_round_trip_is_bit_identical_across_strokes() {
    let mut doc = Document::new(24, 24, 20).unwrap();
    doc.stack_mut().create_layer(Some("ink"));
    doc.save_history("Add layer").unwrap();

    doc.set_tool(ToolKind::Brush {
        color: RED,
        size: 3,
    });
    paint_stroke(&mut doc, (2, 2), (20, 20));
    paint_stroke(&mut doc, (20, 2), (2, 20));

    let full = doc.render();
    assert!(doc.undo().unwrap());
    let one_stroke = doc.render();
    assert_ne!(full.data(), one_stroke.data());

    assert!(doc.redo().unwrap());
    assert_eq!(doc.render().data(), full.data());

    // Undo everything: a blank white composite.
    while doc.undo().unwrap() {}
    let blank = doc.render();
    assert!(blank.data().chunks_exact(4).all(|px| px == [255, 255, 255, 255]));

    // Redo everything: bit-identical to the fully painted state.
    while doc.redo().unwrap() {}
    assert_eq!(doc.render().data(), full.data());
}

#[test]
fn history_stays_bounded_over_many_gestures() {
    let mut doc = Document::new(16, 16, 5).unwrap();
    doc.stack_mut().create_layer(Some("ink"));
    doc.set_tool(ToolKind::Brush {
        color: BLUE,
        size: 2,
    });

    for i in 0..20 {
        let x = i % 12;
        paint_stroke(&mut doc, (x, 0), (x, 15));
        assert!(doc.history().len() <= 5);
    }
    assert_eq!(doc.history().len(), 5);
}

#[test]
fn duplicated_layer_edits_do_not_bleed_into_the_source() {
    let mut doc = Document::new(32, 32, 10).unwrap();
    doc.stack_mut().create_layer(Some("circle"));

    // A blue disc on the source layer.
    doc.set_tool(ToolKind::Brush {
        color: BLUE,
        size: 10,
    });
    paint_stroke(&mut doc, (16, 16), (16, 16));

    let copy_index = doc.stack_mut().duplicate_layer(None).unwrap();
    let source_data = doc.stack().layer(copy_index - 1).unwrap().surface().data().to_vec();
    assert_eq!(
        doc.stack().layer(copy_index).unwrap().surface().data(),
        &source_data[..]
    );

    // Erase on the duplicate; the source must not change.
    doc.set_tool(ToolKind::Eraser { size: 12 });
    paint_stroke(&mut doc, (16, 16), (16, 16));

    assert_eq!(
        doc.stack().layer(copy_index - 1).unwrap().surface().data(),
        &source_data[..]
    );
    assert_ne!(
        doc.stack().layer(copy_index).unwrap().surface().data(),
        &source_data[..]
    );
}

#[test]
fn locked_layer_blocks_gestures_but_unlocking_restores_editing() {
    let mut doc = Document::new(16, 16, 10).unwrap();
    doc.stack_mut().create_layer(Some("ink"));
    doc.stack_mut().toggle_lock(1);

    doc.set_tool(ToolKind::Brush {
        color: RED,
        size: 3,
    });
    paint_stroke(&mut doc, (2, 2), (13, 13));
    assert_eq!(doc.render().pixel(8, 8).unwrap(), WHITE);
    assert!(!doc.history().can_undo());

    doc.stack_mut().toggle_lock(1);
    paint_stroke(&mut doc, (2, 2), (13, 13));
    assert_eq!(doc.render().pixel(8, 8).unwrap(), RED);
}

#[test]
fn hiding_and_reordering_layers_changes_the_composite() {
    let mut doc = Document::new(8, 8, 10).unwrap();

    doc.stack_mut().create_layer(Some("red"));
    doc.stack_mut().active_layer_mut().surface_mut().fill(RED);
    doc.stack_mut().create_layer(Some("blue"));
    doc.stack_mut().active_layer_mut().surface_mut().fill(BLUE);

    // Stack bottom-to-top: background, blue, red.
    assert_eq!(doc.render().pixel(4, 4).unwrap(), RED);

    // Move red below blue.
    doc.stack_mut().move_layer(2, 1);
    assert_eq!(doc.render().pixel(4, 4).unwrap(), BLUE);

    // Hide blue: red shows again.
    doc.stack_mut().toggle_visibility(2);
    assert_eq!(doc.render().pixel(4, 4).unwrap(), RED);
}
