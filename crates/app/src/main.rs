use bevy::prelude::*;
use bevy::render::view::screenshot::{save_to_disk, Screenshot};
use bevy::window::PresentMode;
use bevy::winit::{UpdateMode, WinitSettings};

/// When set, capture one screenshot of the viewer to this path and exit.
const SCREENSHOT_ENV_VAR: &str = "CROP_VIEWER_SCREENSHOT";

/// Frames to wait before capturing, so the first viewer frames are up.
const SCREENSHOT_DELAY_FRAMES: u32 = 90;

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Crop Stress Viewer".to_string(),
            resolution: (1280.0, 800.0).into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }))
    .insert_resource(ClearColor(Color::srgb(0.03, 0.04, 0.05)))
    // The viewer animates continuously, so keep redrawing at ~60 Hz.
    .insert_resource(WinitSettings {
        focused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(16)),
        unfocused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(100)),
    })
    .add_systems(Startup, spawn_camera)
    .add_plugins((
        field::FieldPlugin,
        rendering::RenderingPlugin,
        ui::UiPlugin,
    ));

    if let Ok(path) = std::env::var(SCREENSHOT_ENV_VAR) {
        info!("Screenshot mode: capturing to {path}");
        app.insert_resource(ScreenshotRequest { path, frame: 0 });
        app.add_systems(Update, drive_screenshot);
    }

    app.run();
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

#[derive(Resource)]
struct ScreenshotRequest {
    path: String,
    frame: u32,
}

fn drive_screenshot(
    mut commands: Commands,
    mut request: ResMut<ScreenshotRequest>,
    mut exit: EventWriter<AppExit>,
) {
    request.frame += 1;
    if request.frame == SCREENSHOT_DELAY_FRAMES {
        commands
            .spawn(Screenshot::primary_window())
            .observe(save_to_disk(request.path.clone()));
    } else if request.frame > SCREENSHOT_DELAY_FRAMES + 10 {
        exit.send(AppExit::Success);
    }
}
