use crate::{
    compositor::{DrawList, PaintFill, ShapeGeometry},
    core::{Affine, Canvas},
    layer::{BlendMode, GradientAxis},
    palette::Palette,
};

/// Reference render host: serialize a draw list into standalone SVG
/// markup. Byte-stable for a given draw list, which makes it usable for
/// snapshot-style assertions as well as the CLI.
pub fn render_svg(list: &DrawList, canvas: Canvas) -> String {
    let mut defs = String::new();
    let mut body = String::new();

    for (i, shape) in list.shapes().iter().enumerate() {
        let fill = match &shape.fill {
            PaintFill::Solid(color) => color.to_css(),
            PaintFill::LinearGradient { palette, axis } => {
                push_gradient_def(&mut defs, i, palette, *axis);
                format!("url(#grad{i})")
            }
        };

        let mut attrs = format!(" fill=\"{fill}\" opacity=\"{}\"", shape.opacity);
        if let Some(blur) = shape.blur {
            push_blur_def(&mut defs, i, blur);
            attrs.push_str(&format!(" filter=\"url(#blur{i})\""));
        }
        if shape.transform != Affine::IDENTITY {
            let [a, b, c, d, e, f] = shape.transform.as_coeffs();
            attrs.push_str(&format!(" transform=\"matrix({a} {b} {c} {d} {e} {f})\""));
        }
        if shape.blend == BlendMode::Screen {
            attrs.push_str(" style=\"mix-blend-mode: screen\"");
        }

        match &shape.geometry {
            ShapeGeometry::Path(path) => {
                body.push_str(&format!("  <path d=\"{}\"{attrs}/>\n", path.to_svg()));
            }
            ShapeGeometry::Circle { center, radius } => {
                body.push_str(&format!(
                    "  <circle cx=\"{}\" cy=\"{}\" r=\"{radius}\"{attrs}/>\n",
                    center.x, center.y
                ));
            }
        }
    }

    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {} {}\" \
         preserveAspectRatio=\"xMidYMid slice\">\n<defs>\n{defs}</defs>\n{body}</svg>\n",
        canvas.width, canvas.height
    )
}

fn push_gradient_def(defs: &mut String, index: usize, palette: &Palette, axis: GradientAxis) {
    let (y1, y2) = match axis {
        GradientAxis::BottomToTop => (1, 0),
        GradientAxis::TopToBottom => (0, 1),
    };
    defs.push_str(&format!(
        "  <linearGradient id=\"grad{index}\" x1=\"0\" y1=\"{y1}\" x2=\"0\" y2=\"{y2}\">\n"
    ));
    for stop in palette.stops() {
        let c = stop.color;
        defs.push_str(&format!(
            "    <stop offset=\"{}\" stop-color=\"rgb({}, {}, {})\" stop-opacity=\"{}\"/>\n",
            stop.offset, c.r, c.g, c.b, c.a
        ));
    }
    defs.push_str("  </linearGradient>\n");
}

fn push_blur_def(defs: &mut String, index: usize, std_deviation: f64) {
    defs.push_str(&format!(
        "  <filter id=\"blur{index}\" x=\"-50%\" y=\"-50%\" width=\"200%\" height=\"200%\">\
         <feGaussianBlur in=\"SourceGraphic\" stdDeviation=\"{std_deviation}\"/></filter>\n"
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{engine::Engine, scene::SceneConfig};

    fn frame_svg() -> String {
        let mut e = Engine::new(SceneConfig::aurora(800, 600).unwrap(), 5).unwrap();
        let list = e.tick(0.016).unwrap();
        render_svg(&list, e.canvas())
    }

    #[test]
    fn emits_expected_elements() {
        let svg = frame_svg();
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains("viewBox=\"0 0 800 600\""));
        assert_eq!(svg.matches("<path ").count(), 8);
        assert_eq!(svg.matches("<circle ").count(), 20);
        assert!(svg.contains("<linearGradient"));
        assert!(svg.contains("feGaussianBlur"));
        assert!(svg.contains("mix-blend-mode: screen"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn gradient_ids_match_references() {
        let svg = frame_svg();
        let mut found = 0;
        for part in svg.split("id=\"grad").skip(1) {
            let id: String = part.chars().take_while(char::is_ascii_digit).collect();
            assert!(svg.contains(&format!("url(#grad{id})")), "gradient {id} unreferenced");
            found += 1;
        }
        // veil + three glows carry gradients in the aurora scene
        assert_eq!(found, 4);
    }

    #[test]
    fn output_is_stable_for_a_given_draw_list() {
        let mut e = Engine::new(SceneConfig::aurora(800, 600).unwrap(), 5).unwrap();
        let list = e.tick(0.016).unwrap();
        assert_eq!(render_svg(&list, e.canvas()), render_svg(&list, e.canvas()));
    }

    #[test]
    fn solid_fill_has_no_gradient_def() {
        use crate::compositor::{DrawList, PaintFill, Shape, ShapeGeometry};
        use crate::core::Point;
        use crate::layer::BlendMode;
        use crate::palette::Rgba;

        let list = DrawList::from_shapes(vec![Shape {
            geometry: ShapeGeometry::Circle {
                center: Point::new(10.0, 10.0),
                radius: 2.0,
            },
            fill: PaintFill::Solid(Rgba::WHITE),
            opacity: 1.0,
            blend: BlendMode::Normal,
            blur: None,
            transform: Affine::IDENTITY,
            z: 0,
        }]);
        let svg = render_svg(&list, Canvas::new(100, 100).unwrap());
        assert!(!svg.contains("linearGradient"));
        assert!(svg.contains("rgba(255, 255, 255, 1)"));
    }
}
