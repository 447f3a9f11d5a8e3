use std::time::Instant;

use eframe::egui;

use crate::config::Config;
use crate::controller::Controller;
use crate::persistence::KeyValueStore;
use crate::query::StatusFilter;
use crate::task::Priority;
use crate::theme::Palette;
use crate::view::{Command, ListView, TaskRow, ViewModel};

#[derive(Debug)]
enum KeyAction {
    ClearSearch,
    CycleFilter,
    ToggleTheme,
    IncreaseFontSize,
    DecreaseFontSize,
    ResetFontSize,
}

pub struct TaskpadApp<S: KeyValueStore> {
    controller: Controller<S>,
    categories: Vec<String>,
    search: String,
    base_font_size: f32,
    user_font_size: Option<f32>,
}

impl<S: KeyValueStore> TaskpadApp<S> {
    pub fn new(controller: Controller<S>, config: &Config) -> Self {
        let search = controller.query().search.clone();
        Self {
            controller,
            categories: config.categories.clone(),
            search,
            base_font_size: config.font_size(),
            user_font_size: None,
        }
    }

    fn effective_font_size(&self) -> f32 {
        self.user_font_size.unwrap_or(self.base_font_size)
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) -> Vec<Command> {
        let mut actions = Vec::new();

        ctx.input(|i| {
            for event in &i.events {
                if let egui::Event::Key { key, pressed: true, modifiers, .. } = event {
                    match key {
                        egui::Key::Escape => actions.push(KeyAction::ClearSearch),
                        egui::Key::F if modifiers.command => actions.push(KeyAction::CycleFilter),
                        egui::Key::T if modifiers.command => actions.push(KeyAction::ToggleTheme),
                        egui::Key::Plus | egui::Key::Equals if modifiers.command => {
                            actions.push(KeyAction::IncreaseFontSize)
                        }
                        egui::Key::Minus if modifiers.command => actions.push(KeyAction::DecreaseFontSize),
                        egui::Key::Num0 if modifiers.command => actions.push(KeyAction::ResetFontSize),
                        _ => {}
                    }
                }
            }
        });

        let mut commands = Vec::new();
        for action in actions {
            match action {
                KeyAction::ClearSearch => {
                    self.search.clear();
                    commands.push(Command::ClearSearch);
                }
                KeyAction::CycleFilter => commands.push(Command::CycleFilter),
                KeyAction::ToggleTheme => commands.push(Command::ToggleTheme),
                KeyAction::IncreaseFontSize => {
                    self.user_font_size = Some((self.effective_font_size() + 1.0).min(24.0));
                }
                KeyAction::DecreaseFontSize => {
                    self.user_font_size = Some((self.effective_font_size() - 1.0).max(8.0));
                }
                KeyAction::ResetFontSize => self.user_font_size = None,
            }
        }
        commands
    }

    fn apply_style(&self, ctx: &egui::Context, view: &ViewModel, palette: &Palette) {
        let mut style = (*ctx.style()).clone();
        style.visuals = palette.visuals(view.theme);

        let font_size = self.effective_font_size();
        style.text_styles.insert(
            egui::TextStyle::Body,
            egui::FontId::new(font_size, egui::FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            egui::FontId::new(font_size, egui::FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Small,
            egui::FontId::new(font_size * 0.8, egui::FontFamily::Proportional),
        );
        ctx.set_style(style);
    }

    fn render_header(&self, ui: &mut egui::Ui, view: &ViewModel, palette: &Palette, commands: &mut Vec<Command>) {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new("Tasks")
                    .size(self.effective_font_size() * 1.6)
                    .color(palette.accent)
                    .strong(),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let toggle = ui
                    .button(view.theme.toggle_icon())
                    .on_hover_text("Toggle theme (Ctrl+T)");
                if toggle.clicked() {
                    commands.push(Command::ToggleTheme);
                }
            });
        });
    }

    fn render_form(&mut self, ui: &mut egui::Ui, palette: &Palette, now: Instant, commands: &mut Vec<Command>) {
        let categories = &self.categories;
        let form = self.controller.form_mut();
        let has_error = form.has_error(now);

        let stroke = if has_error {
            egui::Stroke::new(1.5, palette.error)
        } else {
            egui::Stroke::new(1.0, palette.border)
        };

        egui::Frame::none()
            .fill(palette.surface)
            .stroke(stroke)
            .rounding(6.0)
            .inner_margin(egui::Margin::same(8.0))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());

                let response = ui.add(
                    egui::TextEdit::singleline(&mut form.text)
                        .hint_text("What needs to be done?")
                        .desired_width(ui.available_width()),
                );
                if response.changed() {
                    form.on_text_edited();
                }
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    commands.push(Command::Submit);
                    response.request_focus();
                }

                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut form.due_date)
                            .hint_text("YYYY-MM-DD")
                            .desired_width(96.0),
                    );

                    egui::ComboBox::from_id_source("priority")
                        .selected_text(form.priority.label())
                        .show_ui(ui, |ui| {
                            for priority in Priority::ALL {
                                ui.selectable_value(&mut form.priority, priority, priority.label());
                            }
                        });

                    egui::ComboBox::from_id_source("category")
                        .selected_text(form.category.as_str())
                        .show_ui(ui, |ui| {
                            for category in categories {
                                ui.selectable_value(&mut form.category, category.clone(), category.as_str());
                            }
                        });

                    ui.add(
                        egui::TextEdit::singleline(&mut form.location)
                            .hint_text("Location")
                            .desired_width(ui.available_width() - 60.0),
                    );

                    if ui.button("Add").clicked() {
                        commands.push(Command::Submit);
                    }
                });

                if let Some(err) = form.error(now) {
                    ui.label(egui::RichText::new(err.to_string()).color(palette.error).small());
                }
            });
    }

    fn render_controls(&mut self, ui: &mut egui::Ui, view: &ViewModel, palette: &Palette, commands: &mut Vec<Command>) {
        ui.horizontal(|ui| {
            for filter in StatusFilter::ALL {
                if ui.selectable_label(view.filter == filter, filter.label()).clicked() {
                    commands.push(Command::SetFilter(filter));
                }
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.search)
                        .hint_text("🔍 Search tasks...")
                        .desired_width(ui.available_width().min(220.0)),
                );
                if response.changed() {
                    commands.push(Command::SetSearch(self.search.clone()));
                }
            });
        });
        ui.label(
            egui::RichText::new("Ctrl+F: Filter | Ctrl+T: Theme | Esc: Clear search | Ctrl+/- : Font size")
                .color(palette.muted)
                .small(),
        );
    }

    fn render_list(&self, ui: &mut egui::Ui, view: &ViewModel, palette: &Palette, commands: &mut Vec<Command>) {
        match &view.list {
            ListView::Empty { message } => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.label(egui::RichText::new(*message).color(palette.muted));
                });
            }
            ListView::Items(rows) => {
                egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .max_height(ui.available_height() - 60.0)
                    .show(ui, |ui| {
                        for row in rows {
                            self.render_row(ui, row, palette, commands);
                        }
                    });
            }
        }
    }

    fn render_row(&self, ui: &mut egui::Ui, row: &TaskRow, palette: &Palette, commands: &mut Vec<Command>) {
        egui::Frame::none()
            .fill(palette.surface)
            .rounding(4.0)
            .inner_margin(egui::Margin::same(6.0))
            .outer_margin(egui::Margin::symmetric(0.0, 2.0))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    let mut done = row.completed;
                    if ui.checkbox(&mut done, "").clicked() {
                        commands.push(Command::ToggleComplete(row.id));
                    }

                    ui.vertical(|ui| {
                        let mut text = egui::RichText::new(&row.text);
                        text = if row.completed {
                            text.strikethrough().color(palette.muted)
                        } else {
                            text.color(palette.foreground)
                        };
                        ui.label(text);

                        ui.horizontal(|ui| {
                            ui.label(
                                egui::RichText::new(row.priority_label())
                                    .color(palette.priority(row.priority))
                                    .small()
                                    .strong(),
                            );
                            if !row.category.is_empty() {
                                ui.label(egui::RichText::new(&row.category).color(palette.accent).small());
                            }
                            if let Some(due) = &row.due {
                                ui.label(egui::RichText::new(due).color(palette.muted).small());
                            }
                            if let Some(location) = &row.location {
                                ui.label(egui::RichText::new(location).color(palette.muted).small());
                            }
                        });
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let delete = ui.add(egui::Button::new(egui::RichText::new("×").color(palette.error)).frame(false));
                        if delete.on_hover_text("Delete").clicked() {
                            commands.push(Command::Delete(row.id));
                        }
                    });
                });
            });
    }

    fn render_stats(&self, ui: &mut egui::Ui, view: &ViewModel, palette: &Palette) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(view.stats.total_label()).color(palette.muted));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new(view.stats.completion_label()).color(palette.muted));
            });
        });
        ui.add(
            egui::ProgressBar::new(view.stats.fraction())
                .desired_height(6.0)
                .fill(palette.accent),
        );
    }
}

impl<S: KeyValueStore> eframe::App for TaskpadApp<S> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let mut commands = self.handle_keyboard(ctx);

        let view = self.controller.view();
        let palette = Palette::for_theme(view.theme);
        self.apply_style(ctx, &view, &palette);

        egui::TopBottomPanel::bottom("stats")
            .frame(egui::Frame::none().fill(palette.background).inner_margin(12.0))
            .show(ctx, |ui| self.render_stats(ui, &view, &palette));

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(palette.background).inner_margin(16.0))
            .show(ctx, |ui| {
                ui.vertical(|ui| {
                    ui.spacing_mut().item_spacing.y = 8.0;
                    self.render_header(ui, &view, &palette, &mut commands);
                    self.render_form(ui, &palette, now, &mut commands);
                    self.render_controls(ui, &view, &palette, &mut commands);
                    ui.separator();
                    self.render_list(ui, &view, &palette, &mut commands);
                });
            });

        for command in commands {
            self.controller.dispatch(command, now);
        }

        // Wake up again when the error flash should disappear.
        if let Some(deadline) = self.controller.form().error_deadline() {
            let now = Instant::now();
            if deadline > now {
                ctx.request_repaint_after(deadline - now);
            }
        }
    }
}
