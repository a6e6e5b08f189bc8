//! Integration tests for pixview crates.
//!
//! End-to-end checks that drive [`pixview_view::ImageViewport`] the way a host
//! does: decode through `pixview-io`, feed input events, read back the view.

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::mpsc::channel;
    use std::thread;

    use approx::assert_relative_eq;
    use pixview_core::{Rect, Rgba16Buffer};
    use pixview_math::{DVec2, RectF};
    use pixview_view::{
        ImageViewport, Input, InputEvent, Key, LoaderEvent, LoaderHandler, LoaderMsg, Modifier,
        Modifiers, NavigationConfig, PointerButton, Shortcut, ViewportConfig,
    };
    use tempfile::tempdir;

    fn viewport_with_image(width: u32, height: u32) -> ImageViewport {
        let mut viewport = ImageViewport::new(ViewportConfig::default()).unwrap();
        viewport.resize(800.0, 600.0);
        viewport.set_image(Rgba16Buffer::filled(width, height, [0, 0, 0, 65535]));
        viewport
    }

    /// Device position of the centre of image pixel (x, y).
    fn device_pos(viewport: &ImageViewport, x: u32, y: u32) -> DVec2 {
        viewport
            .screenspace()
            .to_screenspace(&DVec2::new(x as f64 + 0.5, y as f64 + 0.5))
    }

    #[test]
    fn test_zoom_sequence_stays_in_range() {
        let mut viewport = viewport_with_image(64, 64);
        let nav = NavigationConfig::default();
        let anchor = DVec2::new(123.0, 456.0);

        for amount in [3.0, 4.0, 2.5, 0.01, 0.5, 0.2, 0.3, 7.0, 100.0, 0.9, 1.7] {
            let before = viewport.zoom();
            let accepted = viewport.zoom_viewport(amount, anchor);
            let z = viewport.zoom();
            assert!(z >= nav.zoom_min && z <= nav.zoom_max, "zoom {z} out of range");
            if !accepted {
                assert_eq!(z, before);
            }
        }
    }

    #[test]
    fn test_screenspace_roundtrip() {
        let mut viewport = viewport_with_image(64, 64);
        viewport.zoom_viewport(2.5, DVec2::new(100.0, 80.0));
        viewport.pan(DVec2::new(-13.0, 7.0));

        let ss = viewport.screenspace();
        let r = RectF::new(12.0, -4.0, 33.0, 21.0);
        let back = ss.to_screenspace(&ss.from_screenspace(&r));
        assert!(back.abs_diff_eq(&r, 1e-9));
    }

    #[test]
    fn test_zoom_inverse_law() {
        let mut viewport = viewport_with_image(64, 64);
        let anchor = DVec2::new(321.0, 123.0);
        let start = viewport.world_rect();

        assert!(viewport.zoom_viewport(4.0, anchor));
        assert!(viewport.zoom_viewport(0.25, anchor));
        assert_relative_eq!(viewport.zoom(), 1.0);
        assert!(viewport.world_rect().abs_diff_eq(&start, 1e-6));
    }

    #[test]
    fn test_pan_roundtrip_is_exact() {
        let mut viewport = viewport_with_image(64, 64);
        let start = viewport.world_rect();
        viewport.pan(DVec2::new(12.5, -7.25));
        viewport.pan(DVec2::new(-12.5, 7.25));
        assert_eq!(viewport.world_rect(), start);
    }

    #[test]
    fn test_reset_pan_centers_at_any_zoom() {
        let mut viewport = viewport_with_image(100, 50);
        for amount in [2.0, 3.0, 0.1] {
            viewport.zoom_viewport(amount, DVec2::new(10.0, 500.0));
            viewport.pan(DVec2::new(77.0, -31.0));
            viewport.reset_pan();
            let c = viewport.world_rect().center();
            assert_relative_eq!(c.x, 50.0, epsilon = 1e-9);
            assert_relative_eq!(c.y, 25.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_shortcut_modifier_semantics() {
        let any = Shortcut::any_modifiers(Input::Key(Key::Home));
        let bare = Shortcut::key(Key::Home, &[]);
        let press = |modifiers| InputEvent::KeyPress {
            key: Key::Home,
            modifiers,
        };

        for mods in [
            Modifiers::NONE,
            Modifiers::CTRL,
            Modifiers::ALT.with(Modifier::Shift).with(Modifier::Meta),
        ] {
            assert!(any.matches(&press(mods)));
            assert_eq!(bare.matches(&press(mods)), mods.is_empty());
        }
    }

    #[test]
    fn test_scenario_center_100x50() {
        let mut viewport = ImageViewport::new(ViewportConfig::default()).unwrap();
        viewport.set_image(Rgba16Buffer::filled(100, 50, [0; 4]));
        viewport.pan(DVec2::new(300.0, 300.0));
        viewport.reset_pan();

        assert_eq!(viewport.zoom(), 1.0);
        let c = viewport.world_rect().center();
        assert_relative_eq!(c.x, 50.0);
        assert_relative_eq!(c.y, 25.0);
    }

    #[test]
    fn test_scenario_zoom_below_min_rejected() {
        let mut viewport = viewport_with_image(10, 10);
        let before = viewport.world_rect();
        assert!(!viewport.zoom_viewport(0.05, DVec2::new(5.0, 5.0)));
        assert_eq!(viewport.zoom(), 1.0);
        assert_eq!(viewport.world_rect(), before);
    }

    #[test]
    fn test_scenario_rotation() {
        let mut viewport = viewport_with_image(4, 2);
        assert_eq!(viewport.rotate_90(90, true).unwrap(), 90);
        assert_eq!(viewport.rotate_90(90, true).unwrap(), 180);
        assert!(viewport.rotate_90(45, true).unwrap_err().is_invalid_argument());
        assert_eq!(viewport.rotation(), 180);
        assert_eq!(viewport.image().map(|i| i.dimensions()), Some((4, 2)));
    }

    #[test]
    fn test_scenario_color_pick_and_expand() {
        let mut viewport = viewport_with_image(100, 50);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        viewport.on_picked_region_changed(move |r| log.borrow_mut().push(r));

        assert_eq!(viewport.picked_region(), None);

        let area = Modifiers::CTRL.with(Modifier::Shift);
        let start = device_pos(&viewport, 10, 5);
        viewport.handle_event(&InputEvent::PointerPress {
            button: PointerButton::Primary,
            pos: start,
            modifiers: area,
        });
        assert_eq!(viewport.picked_region(), Some(Rect::pixel(10, 5)));

        // drag up and to the left: region stays normalized
        let end = device_pos(&viewport, 3, 2);
        viewport.handle_event(&InputEvent::PointerMove {
            pos: end,
            modifiers: area,
        });
        assert_eq!(viewport.picked_region(), Some(Rect::new(3, 2, 8, 4)));

        viewport.handle_event(&InputEvent::PointerRelease {
            button: PointerButton::Primary,
            pos: end,
            modifiers: area,
        });
        assert_eq!(viewport.picked_region(), Some(Rect::new(3, 2, 8, 4)));

        // ctrl + right click hides the picker
        viewport.handle_event(&InputEvent::PointerPress {
            button: PointerButton::Secondary,
            pos: end,
            modifiers: Modifiers::CTRL,
        });
        assert_eq!(viewport.picked_region(), None);

        assert_eq!(
            *seen.borrow(),
            vec![
                Some(Rect::pixel(10, 5)),
                Some(Rect::new(3, 2, 8, 4)),
                None
            ]
        );
    }

    #[test]
    fn test_failed_load_keeps_image() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.png");
        image::RgbImage::from_pixel(6, 4, image::Rgb([255, 0, 0]))
            .save(&good)
            .unwrap();

        let mut viewport = ImageViewport::new(ViewportConfig::default()).unwrap();
        viewport.load_image(&good).unwrap();
        assert_eq!(
            viewport.image().and_then(|i| i.pixel(0, 0)),
            Some([65535, 0, 0, 65535])
        );
        let generation = viewport.image_generation();

        let corrupt = dir.path().join("bad.png");
        std::fs::write(&corrupt, b"\x89PNG\r\n\x1a\nnot really").unwrap();
        assert!(viewport.load_image(&corrupt).is_err());
        assert!(viewport.load_image(dir.path().join("missing.png")).is_err());

        assert_eq!(viewport.image_generation(), generation);
        assert_eq!(viewport.image().map(|i| i.dimensions()), Some((6, 4)));
    }

    #[test]
    fn test_loader_thread_feeds_viewport() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plate.png");
        image::GrayImage::from_pixel(8, 8, image::Luma([128]))
            .save(&path)
            .unwrap();

        let (tx, rx_worker) = channel();
        let (tx_ui, rx) = channel();
        let worker = thread::spawn(move || LoaderHandler::new(rx_worker, tx_ui).run());

        tx.send(LoaderMsg::SyncGeneration(3)).unwrap();
        tx.send(LoaderMsg::Load(path)).unwrap();
        let event = rx.recv().unwrap();
        tx.send(LoaderMsg::Close).unwrap();
        worker.join().unwrap();

        let mut viewport = ImageViewport::new(ViewportConfig::default()).unwrap();
        match event {
            LoaderEvent::Loaded { generation, image, .. } => {
                assert_eq!(generation, 3);
                viewport.set_image(image);
            }
            LoaderEvent::Failed { error, .. } => panic!("load failed: {error}"),
        }
        assert_eq!(
            viewport.image().and_then(|i| i.pixel(4, 4)),
            Some([32896, 32896, 32896, 65535])
        );
    }

    #[test]
    fn test_config_roundtrip_drives_viewport() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("viewport.ron");

        let mut config = ViewportConfig::default();
        config.navigation.zoom_max = 4.0;
        config.shortcuts.reset_pan = Shortcut::key(Key::Char('C'), &[]);
        config.save(&path).unwrap();

        let mut viewport = ImageViewport::new(ViewportConfig::load(&path).unwrap()).unwrap();
        viewport.set_image(Rgba16Buffer::filled(10, 10, [0; 4]));
        assert!(!viewport.zoom_viewport(5.0, DVec2::ZERO));

        viewport.pan(DVec2::new(40.0, 40.0));
        let outcome = viewport.handle_event(&InputEvent::KeyPress {
            key: Key::Char('C'),
            modifiers: Modifiers::NONE,
        });
        assert!(outcome.consumed);
        let c = viewport.world_rect().center();
        assert_relative_eq!(c.x, 5.0);
        assert_relative_eq!(c.y, 5.0);
    }
}
