use shared::models::MetricCard;
use yew::{Html, Properties, function_component, html};
use yew_icons::{Icon, IconId};

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub card: MetricCard,
    #[prop_or(IconId::HeroiconsOutlineChartBar)]
    pub icon: IconId,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    let card = &props.card;
    html! {
        <div class="stat bg-base-200 rounded-box shadow">
            <div class="stat-figure text-primary">
                <Icon icon_id={props.icon} class="w-8 h-8" />
            </div>
            <div class="stat-title">{ card.title.clone() }</div>
            <div class="stat-value text-primary">{ card.value.clone() }</div>
            <div class="stat-desc">{ card.description.clone() }</div>
            if let Some(progress) = card.progress {
                <progress class="progress progress-success w-full mt-2" value={progress.to_string()} max="100"></progress>
            }
        </div>
    }
}
