use crate::components::StatCard;
use crate::models::chat_state::ChatState;
use crate::routes::MainRoute;
use shared::Sender;
use shared::models::{DashboardSnapshot, RecentActivity};
use yew::{Html, function_component, html};
use yew_icons::{Icon, IconId};
use yew_router::prelude::*;
use yewdux::prelude::use_selector;

fn card_icon(title: &str) -> IconId {
    match title {
        "Total Conversations" => IconId::HeroiconsOutlineChatBubbleLeftRight,
        "Messages" => IconId::HeroiconsOutlineDocument,
        "Agent Replies" => IconId::HeroiconsOutlineSparkles,
        "Failed Requests" => IconId::HeroiconsOutlineExclamationTriangle,
        _ => IconId::HeroiconsOutlineChartBar,
    }
}

fn reply_summary(count: usize) -> String {
    match count {
        0 => "No replies".to_string(),
        1 => "1 reply".to_string(),
        n => format!("{n} replies"),
    }
}

fn activity_row(activity: &RecentActivity) -> Html {
    let icon = match activity.sender {
        Sender::User => IconId::HeroiconsOutlineUser,
        Sender::Agent => IconId::HeroiconsOutlineSparkles,
    };
    html! {
        <li key={activity.id.to_string()} class="flex items-start gap-3 py-3">
            <Icon icon_id={icon} class="w-5 h-5 mt-1 text-primary" />
            <div class="flex-grow min-w-0">
                <p class="truncate">{ activity.excerpt.clone() }</p>
                <p class="text-xs text-base-content/60">
                    { format!("{} · {}", activity.timestamp.time_of_day(), reply_summary(activity.reply_count)) }
                </p>
            </div>
        </li>
    }
}

/// Dashboard page component
#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let snapshot = use_selector(|state: &ChatState| DashboardSnapshot::from_session(&state.session));

    html! {
        <div class="p-4 space-y-6">
            <h1 class="text-2xl font-bold">{ "Dashboard" }</h1>

            <div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-4 gap-4">
                { for snapshot.cards.iter().map(|card| html! {
                    <StatCard card={card.clone()} icon={card_icon(&card.title)} />
                }) }
            </div>

            <div class="card bg-base-200 shadow-xl">
                <div class="card-body">
                    <h2 class="card-title">
                        <Icon icon_id={IconId::HeroiconsOutlineClock} class="w-6 h-6" />
                        { "Recent Activity" }
                    </h2>
                    if snapshot.recent.is_empty() {
                        <p class="text-sm text-base-content/70">{ "No conversations yet." }</p>
                    } else {
                        <ul class="divide-y divide-base-300">
                            { for snapshot.recent.iter().map(activity_row) }
                        </ul>
                    }
                    <div class="card-actions justify-end">
                        <Link<MainRoute> to={MainRoute::Chat} classes="btn btn-primary">
                            { "Open Chat" }
                        </Link<MainRoute>>
                    </div>
                </div>
            </div>
        </div>
    }
}
