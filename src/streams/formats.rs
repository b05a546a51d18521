//! The itag format table.
//!
//! YouTube identifies each encoding (container, codec, resolution) by an
//! integer itag. The table below is fixed data; width and height are zero
//! for audio-only entries.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Static metadata for one itag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub description: &'static str,
    pub container: &'static str,
    pub width: u32,
    pub height: u32,
}

const fn info(description: &'static str, container: &'static str, width: u32, height: u32) -> FormatInfo {
    FormatInfo {
        description,
        container,
        width,
        height,
    }
}

#[rustfmt::skip]
static TABLE: &[(&str, FormatInfo)] = &[
    // Legacy progressive formats.
    ("5", info("FLV audio/video", "flv", 400, 240)),
    ("6", info("FLV audio/video", "flv", 450, 270)),
    ("17", info("3GP audio/video", "3gp", 176, 144)),
    ("18", info("MP4 audio/video", "mp4", 640, 360)),
    ("22", info("MP4 audio/video", "mp4", 1280, 720)),
    ("34", info("FLV audio/video", "flv", 640, 360)),
    ("35", info("FLV audio/video", "flv", 854, 480)),
    ("36", info("3GP audio/video", "3gp", 320, 240)),
    ("37", info("MP4 audio/video", "mp4", 1920, 1080)),
    ("38", info("MP4 audio/video", "mp4", 4096, 3072)),
    ("43", info("WebM audio/video", "webm", 640, 360)),
    ("44", info("WebM audio/video", "webm", 854, 480)),
    ("45", info("WebM audio/video", "webm", 1280, 720)),
    ("46", info("WebM audio/video", "webm", 1920, 1080)),
    // 3D.
    ("82", info("MP4 3D audio/video", "mp4", 640, 360)),
    ("83", info("MP4 3D audio/video", "mp4", 854, 480)),
    ("84", info("MP4 3D audio/video", "mp4", 1280, 720)),
    ("85", info("MP4 3D audio/video", "mp4", 1920, 1080)),
    ("100", info("WebM 3D audio/video", "webm", 640, 360)),
    ("101", info("WebM 3D audio/video", "webm", 854, 480)),
    ("102", info("WebM 3D audio/video", "webm", 1280, 720)),
    // HLS.
    ("92", info("MP4 HLS audio/video", "mp4", 400, 240)),
    ("93", info("MP4 HLS audio/video", "mp4", 640, 360)),
    ("94", info("MP4 HLS audio/video", "mp4", 854, 480)),
    ("95", info("MP4 HLS audio/video", "mp4", 1280, 720)),
    ("96", info("MP4 HLS audio/video", "mp4", 1920, 1080)),
    ("132", info("MP4 HLS audio/video", "mp4", 400, 240)),
    ("151", info("MP4 HLS audio/video", "mp4", 88, 72)),
    // DASH MP4 video.
    ("133", info("DASH MP4 video", "mp4", 400, 240)),
    ("134", info("DASH MP4 video", "mp4", 640, 360)),
    ("135", info("DASH MP4 video", "mp4", 854, 480)),
    ("136", info("DASH MP4 video", "mp4", 1280, 720)),
    ("137", info("DASH MP4 video", "mp4", 1920, 1080)),
    ("160", info("DASH MP4 video", "mp4", 176, 144)),
    ("264", info("DASH MP4 video", "mp4", 2560, 1440)),
    ("266", info("DASH MP4 video", "mp4", 3840, 2160)),
    ("298", info("DASH MP4 video", "mp4", 1280, 720)),
    ("299", info("DASH MP4 video", "mp4", 1920, 1080)),
    // DASH MP4 audio.
    ("139", info("DASH MP4 audio", "m4a", 0, 0)),
    ("140", info("DASH MP4 audio", "m4a", 0, 0)),
    ("141", info("DASH MP4 audio", "m4a", 0, 0)),
    // DASH WebM video.
    ("167", info("DASH WebM video", "webm", 640, 360)),
    ("168", info("DASH WebM video", "webm", 854, 480)),
    ("169", info("DASH WebM video", "webm", 1280, 720)),
    ("170", info("DASH WebM video", "webm", 1920, 1080)),
    ("218", info("DASH WebM video", "webm", 854, 480)),
    ("219", info("DASH WebM video", "webm", 854, 480)),
    ("242", info("DASH WebM video", "webm", 400, 240)),
    ("243", info("DASH WebM video", "webm", 640, 360)),
    ("244", info("DASH WebM video", "webm", 854, 480)),
    ("245", info("DASH WebM video", "webm", 854, 480)),
    ("246", info("DASH WebM video", "webm", 854, 480)),
    ("247", info("DASH WebM video", "webm", 1280, 720)),
    ("248", info("DASH WebM video", "webm", 1920, 1080)),
    ("271", info("DASH WebM video", "webm", 2560, 1440)),
    ("272", info("DASH WebM video", "webm", 3840, 2160)),
    ("278", info("DASH WebM video", "webm", 176, 144)),
    ("302", info("DASH WebM video", "webm", 1280, 720)),
    ("303", info("DASH WebM video", "webm", 1920, 1080)),
    ("308", info("DASH WebM video", "webm", 2560, 1440)),
    ("313", info("DASH WebM video", "webm", 3840, 2160)),
    ("315", info("DASH WebM video", "webm", 3840, 2160)),
    // DASH WebM audio.
    ("171", info("DASH WebM audio", "webm", 0, 0)),
    ("172", info("DASH WebM audio", "webm", 0, 0)),
    ("249", info("DASH WebM audio", "webm", 0, 0)),
    ("250", info("DASH WebM audio", "webm", 0, 0)),
    ("251", info("DASH WebM audio", "webm", 0, 0)),
];

static BY_ITAG: Lazy<HashMap<&'static str, &'static FormatInfo>> =
    Lazy::new(|| TABLE.iter().map(|(itag, info)| (*itag, info)).collect());

/// Looks up the static metadata for an itag, if known.
pub fn lookup(itag: &str) -> Option<&'static FormatInfo> {
    BY_ITAG.get(itag).copied()
}
