use arplace_assets::{AssetCatalog, AssetHandle, LoadState, ModelAsset};
use arplace_selection::{Intent, Phase, SelectionState};
use egui::Sense;
use egui::load::SizedTexture;
use std::collections::HashMap;

const TILE: f32 = 80.0;

/// GPU copies of the catalog thumbnails, uploaded once.
pub struct Thumbnails {
    textures: HashMap<AssetHandle, egui::TextureHandle>,
}

impl Thumbnails {
    pub fn upload(ctx: &egui::Context, catalog: &AssetCatalog) -> Self {
        let textures = catalog
            .iter()
            .filter_map(|(handle, asset)| {
                let thumb = asset.thumbnail()?;
                let image = egui::ColorImage::from_rgba_unmultiplied(thumb.size(), &thumb.rgba);
                let texture = ctx.load_texture(
                    format!("thumbnail:{}", asset.identifier()),
                    image,
                    egui::TextureOptions::LINEAR,
                );
                Some((handle, texture))
            })
            .collect();
        Self { textures }
    }

    pub fn get(&self, handle: AssetHandle) -> Option<&egui::TextureHandle> {
        self.textures.get(&handle)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }
}

/// Draws the bottom controls for the current phase and reports what the
/// user asked for. The selection itself is never touched here.
pub fn show(
    ctx: &egui::Context,
    selection: &SelectionState<AssetHandle>,
    catalog: &AssetCatalog,
    thumbnails: &Thumbnails,
) -> Option<Intent<AssetHandle>> {
    egui::TopBottomPanel::bottom("placement_controls")
        .resizable(false)
        .show(ctx, |ui| match selection.phase() {
            Phase::Idle => {
                ui.label("No models found in the resource directory.");
                None
            }
            Phase::Browsing => model_picker(ui, catalog, thumbnails),
            Phase::PlacementArmed => placement_buttons(ui),
        })
        .inner
}

fn model_picker(
    ui: &mut egui::Ui,
    catalog: &AssetCatalog,
    thumbnails: &Thumbnails,
) -> Option<Intent<AssetHandle>> {
    let mut picked = None;
    egui::ScrollArea::horizontal().show(ui, |ui| {
        ui.horizontal(|ui| {
            for (handle, asset) in catalog.iter() {
                let response = match thumbnails.get(handle) {
                    Some(texture) => {
                        let sized = SizedTexture::new(texture.id(), egui::vec2(TILE, TILE));
                        ui.add(egui::Image::from_texture(sized).sense(Sense::click()))
                    }
                    None => ui.add_sized([TILE, TILE], egui::Button::new(asset.identifier())),
                };

                if response.on_hover_text(describe(asset)).clicked() {
                    log::debug!("selected model {}", asset.identifier());
                    picked = Some(Intent::Pick(handle));
                }
            }
        });
    });
    picked
}

fn placement_buttons(ui: &mut egui::Ui) -> Option<Intent<AssetHandle>> {
    let mut intent = None;
    ui.horizontal(|ui| {
        let size = egui::vec2(60.0, 60.0);
        if ui.add(egui::Button::new("✖").min_size(size)).clicked() {
            log::debug!("cancel model placement");
            intent = Some(Intent::Cancel);
        }
        if ui.add(egui::Button::new("✔").min_size(size)).clicked() {
            log::debug!("confirm model placement");
            intent = Some(Intent::Confirm);
        }
    });
    intent
}

fn describe(asset: &ModelAsset) -> String {
    let state = match asset.load_state() {
        LoadState::Pending => "loading…".to_string(),
        LoadState::Loaded(model) => format!("{} triangles", model.triangle_count()),
        LoadState::Failed(err) => format!("unavailable: {err}"),
    };
    format!("{}\n{state}", asset.identifier())
}
