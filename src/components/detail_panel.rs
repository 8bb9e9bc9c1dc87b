//! Overlay showing the text of the selected hub or cluster.

use leptos::prelude::*;

use super::cluster_map::NodeDetails;

/// Shows `details` while something is selected. The close button bumps
/// `close_requests`, which the map treats like Escape.
#[component]
pub fn DetailPanel(
	/// The selected node's text.
	#[prop(into)]
	details: Signal<Option<NodeDetails>>,
	/// Incremented on every close click.
	close_requests: WriteSignal<u32>,
) -> impl IntoView {
	move || {
		details.get().map(|d| {
			let glyph = d.glyph.clone().unwrap_or_default();
			let location = d.location.clone();
			let description = d.description.clone();
			let bullets = d.bullets.clone();
			view! {
				<aside class="detail-panel">
					<button class="detail-close" on:click=move |_| close_requests.update(|n| *n += 1)>
						"×"
					</button>
					<h2>
						<span class="detail-glyph">{glyph}</span>
						" "
						{d.name.clone()}
					</h2>
					{location.map(|l| view! { <p class="detail-location">{l}</p> })}
					{description.map(|t| view! { <p class="detail-description">{t}</p> })}
					<ul class="detail-bullets">
						{bullets.into_iter().map(|b| view! { <li>{b}</li> }).collect_view()}
					</ul>
				</aside>
			}
		})
	}
}
