//! Seller dashboard commands.

use greencart_client::forms::{PlantForm, RecordSaleForm};
use greencart_client::hooks::SellerDashboardHook;
use greencart_client::routes::SellerPage;
use greencart_client::{ApiClient, Route};
use greencart_core::CategoryId;

use super::{enter, read_images};
use crate::error::{self, Result};
use crate::render;
use crate::{PlantArgs, SellerAction};

impl From<PlantArgs> for PlantForm {
    fn from(args: PlantArgs) -> Self {
        Self {
            name: args.name,
            description: args.description,
            base_price: args.price,
            stock_quantity: args.stock,
            category_ids: args.categories.into_iter().map(CategoryId::new).collect(),
            features: args.features,
            care_tips: args.care_tips,
            sizes: args.sizes,
            images: args.images,
        }
    }
}

const fn page_of(action: &SellerAction) -> SellerPage {
    match action {
        SellerAction::Dashboard => SellerPage::Dashboard,
        SellerAction::Plants | SellerAction::Show { .. } | SellerAction::Upload { .. } => {
            SellerPage::Plants
        }
        SellerAction::Add { .. } => SellerPage::AddPlant,
        SellerAction::Edit { id, .. } => SellerPage::EditPlant(*id),
        SellerAction::Sales => SellerPage::Sales,
        SellerAction::RecordSale { .. } => SellerPage::RecordSale,
    }
}

pub async fn run(api: &ApiClient, action: SellerAction) -> Result<()> {
    if !enter(api, Route::Seller(page_of(&action))) {
        return Ok(());
    }
    let hook = SellerDashboardHook::mount(api).await;

    match action {
        SellerAction::Dashboard => render::seller_dashboard(&hook.state()),
        SellerAction::Plants => {
            let state = hook.state();
            render::seller_plants(&state.plants.data, state.plants.error.as_ref());
        }
        SellerAction::Add { plant, attachments } => {
            let attachments = read_images(&attachments).await?;
            let form = PlantForm::from(plant);
            let added = hook.add_plant(&form, &attachments).await?;
            error::add_breadcrumb("seller", "Plant listed", &[("name", form.name.as_str())]);
            render::message(added.message.as_deref().unwrap_or("Plant added."));
            for url in &added.image_urls {
                render::message(&format!("  image: {url}"));
            }
        }
        SellerAction::Show { id } => {
            let plant = hook.plant_detail(id).await?;
            render::seller_plant(&plant);
        }
        SellerAction::Edit { id, plant } => {
            let outcome = hook.update_plant(id, &PlantForm::from(plant)).await?;
            render::outcome(&outcome, "Plant updated.");
        }
        SellerAction::Upload { files } => {
            let images = read_images(&files).await?;
            let uploaded = hook.upload_images(&images).await?;
            render::uploaded(&uploaded);
        }
        SellerAction::Sales => {
            let state = hook.state();
            if let Some(error) = &state.sales.error {
                render::error(error);
            }
            render::sales(&state.sales.data);
        }
        SellerAction::RecordSale {
            plant,
            quantity,
            email,
            price,
        } => {
            let form = RecordSaleForm {
                plant_id: Some(plant),
                quantity,
                customer_email: email,
                sale_price: price,
            };
            let recorded = hook.record_sale(&form).await?;
            render::message(recorded.message.as_deref().unwrap_or("Sale recorded."));
        }
    }
    Ok(())
}
