//! LineLook: visual styling for lines on a plot canvas.

use eframe::egui;
use egui_plot::LineStyle;

/// The visual presentation of a line (color, visibility, width, dash style).
#[derive(Debug, Clone, PartialEq)]
pub struct LineLook {
    pub color: egui::Color32,
    pub visible: bool,
    pub width: f32,
    pub style: LineStyle,
}

impl Default for LineLook {
    fn default() -> Self {
        Self {
            color: egui::Color32::GRAY,
            visible: true,
            width: 1.5,
            style: LineStyle::Solid,
        }
    }
}

impl LineLook {
    /// Create a new LineLook with a color allocated based on the line index.
    pub fn new(index: usize) -> Self {
        Self {
            color: Self::alloc_color(index),
            ..Default::default()
        }
    }

    /// Allocate a distinct color for the given line index.
    pub fn alloc_color(index: usize) -> egui::Color32 {
        const PALETTE: [egui::Color32; 10] = [
            egui::Color32::from_rgb(31, 119, 180),
            egui::Color32::from_rgb(255, 127, 14),
            egui::Color32::from_rgb(44, 160, 44),
            egui::Color32::from_rgb(214, 39, 40),
            egui::Color32::from_rgb(148, 103, 189),
            egui::Color32::from_rgb(140, 86, 75),
            egui::Color32::from_rgb(227, 119, 194),
            egui::Color32::from_rgb(127, 127, 127),
            egui::Color32::from_rgb(188, 189, 34),
            egui::Color32::from_rgb(23, 190, 207),
        ];
        PALETTE[index % PALETTE.len()]
    }

    pub fn with_color(mut self, color: egui::Color32) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    /// Render an inline editor for a LineLook.
    pub fn render_editor(&mut self, ui: &mut egui::Ui, label: Option<&str>) {
        if let Some(l) = label {
            ui.strong(l);
        }
        ui.horizontal(|ui| {
            ui.checkbox(&mut self.visible, "Visible");
            ui.label("Color");
            let mut c = self.color;
            if ui.color_edit_button_srgba(&mut c).changed() {
                self.color = c;
            }
            ui.label("Width");
            ui.add(
                egui::DragValue::new(&mut self.width)
                    .range(0.1..=10.0)
                    .speed(0.1),
            );
        });
        let id = ui.next_auto_id();
        egui::ComboBox::from_id_salt(id)
            .selected_text(match self.style {
                LineStyle::Solid => "Solid",
                LineStyle::Dashed { .. } => "Dashed",
                LineStyle::Dotted { .. } => "Dotted",
            })
            .show_ui(ui, |ui| {
                if ui
                    .selectable_label(matches!(self.style, LineStyle::Solid), "Solid")
                    .clicked()
                {
                    self.style = LineStyle::Solid;
                }
                if ui
                    .selectable_label(matches!(self.style, LineStyle::Dashed { .. }), "Dashed")
                    .clicked()
                {
                    self.style = LineStyle::Dashed { length: 6.0 };
                }
                if ui
                    .selectable_label(matches!(self.style, LineStyle::Dotted { .. }), "Dotted")
                    .clicked()
                {
                    self.style = LineStyle::Dotted { spacing: 4.0 };
                }
            });
    }
}
