//! Fixed library, asset, permission and ABI identifiers understood by the packager.

/// Native library file names, grouped by capability
pub mod libraries {
    /// OpenCV image processing
    pub const OPEN_CV: &[&str] = &["libopencv_java4.so"];
    /// Google ML Kit OCR pipeline
    pub const MLKIT_OCR: &[&str] = &["libmlkit_google_ocr_pipeline.so"];
    /// Terminal emulator support
    pub const TERMINAL_EMULATOR: &[&str] = &["libjackpal-androidterm5.so", "libjackpal-termexec2.so"];
}

/// Asset destinations and sources
pub mod assets {
    /// URI scheme prefix for files bundled with the runtime
    pub const RUNTIME_ASSETS: &str = "file:///android_asset";
    /// Destination of the project directory inside the package
    pub const PROJECT: &str = "/project";
    /// Destination of the ML Kit OCR models
    pub const MLKIT_OCR_MODELS: &str = "/mlkit-google-ocr-models";
}

/// Permission tags
pub mod permissions {
    /// Accessibility service
    pub const ACCESSIBILITY_SERVICES: &str = "accessibility_services";
    /// Start activities from the background
    pub const BACKGROUND_START: &str = "background_start";
    /// Draw over other apps
    pub const DRAW_OVERLAY: &str = "draw_overlay";
}

/// Target ABIs
pub mod abi {
    /// 64-bit ARM
    pub const ARM64_V8A: &str = "arm64-v8a";
    /// 64-bit x86
    pub const X86_64: &str = "x86_64";
    /// ABIs the packager can target, in default order
    pub const KNOWN: &[&str] = &[ARM64_V8A, X86_64];
}

/// Resource names used when storing icons
pub mod icons {
    /// Launcher icon file stem
    pub const LAUNCHER: &str = "logo";
    /// Splash icon file stem
    pub const SPLASH: &str = "splashIcon";
}
