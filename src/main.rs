//! refline-demo: a plot with a sine trace and a few reference lines.
//!
//! Usage: `refline-demo [config.json|config.yaml]`. Set `RUST_LOG=refline=debug`
//! to watch the lines being re-clipped while panning and zooming.

use std::path::PathBuf;

use eframe::egui;
use tracing_subscriber::EnvFilter;

use refline::{
    draw_with_params, load_config, LineId, LineLook, PlotCanvas, RefLineConfig, RefLineDef,
    RefLineKind,
};

struct DemoApp {
    canvas: PlotCanvas,
    default_look: LineLook,
    ref_lines: Vec<(LineId, String)>,
    new_kind: RefLineKind,
    new_params: [f64; 3],
    last_error: Option<String>,
}

impl DemoApp {
    fn new(cfg: &RefLineConfig) -> Self {
        let mut app = Self {
            canvas: PlotCanvas::from_config(cfg),
            default_look: cfg.default_look.clone(),
            ref_lines: Vec::new(),
            new_kind: RefLineKind::Horizontal,
            new_params: [1.0, 0.0, 0.0],
            last_error: None,
        };

        let sine: Vec<[f64; 2]> = (0..=400)
            .map(|i| {
                let x = -10.0 + i as f64 * 0.05;
                [x, 3.0 * x.sin()]
            })
            .collect();
        if let Err(e) = app.canvas.add_data_line("sine", &sine, LineLook::new(0)) {
            app.report(e);
        }

        for def in &cfg.lines {
            let look = def.look.clone().unwrap_or_else(|| app.default_look.clone());
            app.add_ref_line(def.kind, &def.params, &look);
        }
        app
    }

    fn add_ref_line(&mut self, kind: RefLineKind, params: &[f64], look: &LineLook) {
        match draw_with_params(&mut self.canvas, kind, params, look) {
            Ok(id) => {
                let label = format!("{kind:?} {params:?}");
                tracing::info!(%id, %label, "reference line added");
                self.ref_lines.push((id, label));
            }
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, e: refline::RefLineError) {
        tracing::warn!(error = %e, "reference line operation failed");
        self.last_error = Some(e.to_string());
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Reference lines");
        ui.separator();

        let mut auto = self.canvas.auto_range();
        if ui.checkbox(&mut auto, "Auto range").changed() {
            if let Err(e) = self.canvas.set_auto_range(auto) {
                self.report(e);
            }
        }

        ui.separator();
        egui::ComboBox::from_label("Kind")
            .selected_text(format!("{:?}", self.new_kind))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut self.new_kind, RefLineKind::Horizontal, "Horizontal");
                ui.selectable_value(&mut self.new_kind, RefLineKind::Vertical, "Vertical");
                ui.selectable_value(&mut self.new_kind, RefLineKind::Infinite, "Infinite");
            });
        let labels: &[&str] = match self.new_kind {
            RefLineKind::Horizontal => &["y"],
            RefLineKind::Vertical => &["x"],
            RefLineKind::Infinite => &["slope", "x", "y"],
        };
        for (label, value) in labels.iter().zip(self.new_params.iter_mut()) {
            ui.horizontal(|ui| {
                ui.label(*label);
                ui.add(egui::DragValue::new(value).speed(0.1));
            });
        }
        self.default_look.render_editor(ui, Some("Look"));
        if ui.button("Add").clicked() {
            let params = self.new_params[..labels.len()].to_vec();
            let look = self.default_look.clone();
            self.add_ref_line(self.new_kind, &params, &look);
        }

        ui.separator();
        let mut remove = None;
        for (id, label) in &self.ref_lines {
            ui.horizontal(|ui| {
                ui.label(label);
                if ui.small_button("✖").clicked() {
                    remove = Some(*id);
                }
            });
        }
        if let Some(id) = remove {
            self.ref_lines.retain(|(l, _)| *l != id);
            if let Err(e) = self.canvas.remove_line(id) {
                self.report(e);
            }
        }

        if let Some(err) = &self.last_error {
            ui.separator();
            ui.colored_label(egui::Color32::LIGHT_RED, err);
        }
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("refline_controls")
            .resizable(true)
            .show(ctx, |ui| self.render_controls(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Err(e) = self.canvas.show(ui) {
                self.report(e);
            }
        });
    }
}

fn demo_config() -> RefLineConfig {
    RefLineConfig {
        lines: vec![
            RefLineDef::horizontal(0.0),
            RefLineDef::vertical(0.0),
            RefLineDef::infinite(0.5, 0.0, 1.0)
                .with_look(
                    LineLook::new(3).with_style(egui_plot::LineStyle::Dashed { length: 6.0 }),
                ),
        ],
        ..RefLineConfig::default()
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => match load_config(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => demo_config(),
    };

    tracing::info!("Starting refline demo");
    let app = DemoApp::new(&cfg);
    let opts = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(egui::vec2(1200.0, 800.0)),
        ..Default::default()
    };
    eframe::run_native(&cfg.title, opts, Box::new(|_cc| Ok(Box::new(app))))
}
