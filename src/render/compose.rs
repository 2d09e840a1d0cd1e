//! Argument builders for the ImageMagick pipeline.
//!
//! Kept free of I/O so the geometry can be checked without ImageMagick
//! installed.

use std::path::Path;

use super::Resolution;
use super::magick::escape_text;

/// Space around the caption text
pub const CAPTION_MARGIN: u32 = 20;
pub const JPEG_QUALITY: &str = "95";

pub struct Caption<'a> {
    pub title: &'a str,
    pub font: Option<&'a str>,
    pub point_size: u32,
}

/// Scale `src` to fit inside `dst` keeping its aspect ratio.
///
/// When the screen is wider than the image the height is matched,
/// otherwise the width is.
pub fn fit_within(src: (u32, u32), dst: Resolution) -> (u32, u32) {
    let (src_w, src_h) = (u64::from(src.0.max(1)), u64::from(src.1.max(1)));
    let (dst_w, dst_h) = (u64::from(dst.width), u64::from(dst.height));

    let (w, h) = if dst_w * src_h > src_w * dst_h {
        (dst_h * src_w / src_h, dst_h)
    } else {
        (dst_w, dst_w * src_h / src_w)
    };
    (w.max(1) as u32, h.max(1) as u32)
}

/// Put the caption in a black block above the image and a black strip of
/// `bottom_strip` rows below it.
pub fn caption_args(
    image: &Path,
    image_width: u32,
    caption: &Caption<'_>,
    bottom_strip: u32,
    out: &Path,
) -> Vec<String> {
    let mut args = vec![
        format!("{}[0]", image.display()),
        "-background".into(),
        "black".into(),
        "-alpha".into(),
        "remove".into(),
        "-alpha".into(),
        "off".into(),
    ];

    if !caption.title.trim().is_empty() {
        let text_width = image_width.saturating_sub(2 * CAPTION_MARGIN).max(1);
        args.extend([
            "(".into(),
            "-size".into(),
            format!("{}x", text_width),
            "-background".into(),
            "black".into(),
            "-fill".into(),
            "white".into(),
        ]);
        if let Some(font) = caption.font {
            args.extend(["-font".into(), font.to_string()]);
        }
        args.extend([
            "-pointsize".into(),
            caption.point_size.to_string(),
            format!("caption:{}", escape_text(caption.title.trim())),
            "-bordercolor".into(),
            "black".into(),
            "-border".into(),
            CAPTION_MARGIN.to_string(),
            ")".into(),
            "+swap".into(),
            "-append".into(),
        ]);
    }

    if bottom_strip > 0 {
        args.extend([
            "-gravity".into(),
            "south".into(),
            "-splice".into(),
            format!("0x{}", bottom_strip),
        ]);
    }

    args.extend(["+repage".into(), out.display().to_string()]);
    args
}

/// Resize to the fitted size and centre on a black screen-sized canvas
pub fn fit_args(
    image: &Path,
    image_size: (u32, u32),
    screen: Resolution,
    out: &Path,
) -> Vec<String> {
    let (w, h) = fit_within(image_size, screen);
    vec![
        format!("{}[0]", image.display()),
        "-resize".into(),
        format!("{}x{}!", w, h),
        "-background".into(),
        "black".into(),
        "-gravity".into(),
        "center".into(),
        "-extent".into(),
        screen.to_string(),
        "-quality".into(),
        JPEG_QUALITY.into(),
        out.display().to_string(),
    ]
}

/// A plain black screen with a short message, used when no fallback image is configured
pub fn placeholder_args(
    screen: Resolution,
    message: &str,
    point_size: u32,
    out: &Path,
) -> Vec<String> {
    vec![
        "-size".into(),
        screen.to_string(),
        "xc:black".into(),
        "-fill".into(),
        "white".into(),
        "-pointsize".into(),
        point_size.to_string(),
        "-gravity".into(),
        "center".into(),
        "-annotate".into(),
        "+0+0".into(),
        escape_text(message),
        "-quality".into(),
        JPEG_QUALITY.into(),
        out.display().to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const FULL_HD: Resolution = Resolution {
        width: 1920,
        height: 1080,
    };

    #[test]
    fn tall_image_fits_to_height() {
        assert_eq!(fit_within((500, 1000), FULL_HD), (540, 1080));
    }

    #[test]
    fn wide_image_fits_to_width() {
        assert_eq!(fit_within((4000, 1000), FULL_HD), (1920, 480));
    }

    #[test]
    fn same_ratio_fills_screen() {
        assert_eq!(fit_within((1280, 720), FULL_HD), (1920, 1080));
    }

    #[test]
    fn tiny_results_stay_visible() {
        let (w, h) = fit_within((10_000, 1), FULL_HD);
        assert_eq!(w, 1920);
        assert_eq!(h, 1);
    }

    #[test]
    fn caption_block_sits_above_image() {
        let caption = Caption {
            title: "When the build passes",
            font: Some("DejaVu-Sans"),
            point_size: 40,
        };
        let args = caption_args(
            &PathBuf::from("/tmp/meme.png"),
            800,
            &caption,
            50,
            &PathBuf::from("/tmp/out.png"),
        );

        assert_eq!(args[0], "/tmp/meme.png[0]");
        assert!(args.contains(&"760x".to_string()));
        assert!(args.contains(&"caption:When the build passes".to_string()));
        let font = args.iter().position(|a| a == "-font").unwrap();
        assert_eq!(args[font + 1], "DejaVu-Sans");

        let swap = args.iter().position(|a| a == "+swap").unwrap();
        assert_eq!(args[swap + 1], "-append");
        assert!(args.contains(&"0x50".to_string()));
        assert_eq!(args.last().unwrap(), "/tmp/out.png");
    }

    #[test]
    fn empty_title_skips_caption() {
        let caption = Caption {
            title: "   ",
            font: None,
            point_size: 40,
        };
        let args = caption_args(
            &PathBuf::from("in.jpg"),
            800,
            &caption,
            0,
            &PathBuf::from("out.png"),
        );

        assert!(!args.iter().any(|a| a.starts_with("caption:")));
        assert!(!args.contains(&"-splice".to_string()));
    }

    #[test]
    fn narrow_image_keeps_a_positive_caption_width() {
        let caption = Caption {
            title: "hi",
            font: None,
            point_size: 12,
        };
        let args = caption_args(
            &PathBuf::from("in.jpg"),
            30,
            &caption,
            0,
            &PathBuf::from("out.png"),
        );
        assert!(args.contains(&"1x".to_string()));
        assert!(!args.contains(&"-font".to_string()));
    }

    #[test]
    fn fit_extends_to_screen() {
        let args = fit_args(
            &PathBuf::from("in.png"),
            (500, 1000),
            FULL_HD,
            &PathBuf::from("out.jpg"),
        );
        assert!(args.contains(&"540x1080!".to_string()));
        let extent = args.iter().position(|a| a == "-extent").unwrap();
        assert_eq!(args[extent + 1], "1920x1080");
    }

    #[test]
    fn placeholder_is_a_screen_sized_black_canvas() {
        let screen = Resolution {
            width: 2560,
            height: 1440,
        };
        let args = placeholder_args(screen, "100% fresh", 40, &PathBuf::from("/tmp/fallback.jpg"));

        assert_eq!(args[0], "-size");
        assert_eq!(args[1], "2560x1440");
        assert_eq!(args[2], "xc:black");
        let annotate = args.iter().position(|a| a == "-annotate").unwrap();
        assert_eq!(args[annotate + 1], "+0+0");
        assert_eq!(args[annotate + 2], "100%% fresh");
        let quality = args.iter().position(|a| a == "-quality").unwrap();
        assert_eq!(args[quality + 1], JPEG_QUALITY);
        assert_eq!(args.last().unwrap(), "/tmp/fallback.jpg");
    }
}
