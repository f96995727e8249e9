use crate::charts::{
    axis_ticks, bar_layout, palette_color, pie_slices, show_bar_labels, slice_tooltip,
};
use crate::view_model::CategoryCount;
use leptos::prelude::*;

const PIE_SIZE: f64 = 260.0;
const PIE_RADIUS: f64 = 80.0;

const BAR_WIDTH: f64 = 520.0;
const BAR_HEIGHT: f64 = 220.0;
const AXIS_GUTTER: f64 = 36.0;
const LABEL_GUTTER: f64 = 44.0;

/// Category pie with an optional percentage label per slice.
#[component]
pub fn PieChart(
    #[prop(into)] data: Signal<Vec<CategoryCount>>,
    #[prop(optional)] show_labels: bool,
) -> impl IntoView {
    let c = PIE_SIZE / 2.0;
    let slices = Memo::new(move |_| data.with(|d| pie_slices(d, PIE_RADIUS, c, c)));

    view! {
        <Show
            when=move || !slices.with(|s| s.is_empty())
            fallback=|| view! { <p class="py-10 text-center text-sm text-muted-foreground">"No data"</p> }
        >
            <div class="flex flex-col items-center gap-3">
                <svg
                    viewBox=format!("0 0 {PIE_SIZE} {PIE_SIZE}")
                    class="w-full max-w-[280px] overflow-visible"
                    role="img"
                    aria-label="Items per category"
                >
                    <For
                        each=move || slices.get()
                        key=|s| (s.name.clone(), s.value, s.path.clone())
                        children=move |s| {
                            let anchor = if s.label_x >= c { "start" } else { "end" };
                            let tooltip = slice_tooltip(&s.name, s.value);
                            view! {
                                <g>
                                    <title>{tooltip}</title>
                                    <path d=s.path.clone() fill=s.color stroke="white" stroke-width="1" />
                                </g>
                                {show_labels.then(|| view! {
                                    <text
                                        x=format!("{:.1}", s.label_x)
                                        y=format!("{:.1}", s.label_y)
                                        text-anchor=anchor
                                        dominant-baseline="middle"
                                        class="fill-foreground text-[10px]"
                                    >
                                        {s.label.clone()}
                                    </text>
                                })}
                            }
                        }
                    />
                </svg>
                <ul class="flex flex-wrap justify-center gap-x-4 gap-y-1 text-xs text-muted-foreground">
                    <For
                        each=move || slices.get()
                        key=|s| (s.name.clone(), s.color)
                        children=move |s| view! {
                            <li class="flex items-center gap-1.5">
                                <span class="inline-block size-2.5 rounded-sm" style=format!("background:{}", s.color)></span>
                                {s.name}
                            </li>
                        }
                    />
                </ul>
            </div>
        </Show>
    }
}

/// Vertical bars with a value axis. Category labels are dropped when too many
/// bars would overlap.
#[component]
pub fn BarChart(
    #[prop(into)] data: Signal<Vec<(String, i64)>>,
    #[prop(into, optional)] label: String,
) -> impl IntoView {
    let plot_w = BAR_WIDTH - AXIS_GUTTER;
    let plot_h = BAR_HEIGHT - LABEL_GUTTER;

    let bars = Memo::new(move |_| data.with(|d| bar_layout(d, plot_w, plot_h)));
    let labels_visible = move || bars.with(|b| show_bar_labels(b.len()));
    let ticks = Memo::new(move |_| {
        let max = data.with(|d| d.iter().map(|(_, v)| *v).max().unwrap_or(0));
        axis_ticks(max)
    });
    let top = move || ticks.with(|t| t.last().copied().unwrap_or(0));

    view! {
        <Show
            when=move || !bars.with(|b| b.is_empty())
            fallback=|| view! { <p class="py-10 text-center text-sm text-muted-foreground">"No data"</p> }
        >
            <svg
                viewBox=format!("0 0 {BAR_WIDTH} {BAR_HEIGHT}")
                class="w-full"
                role="img"
                aria-label=label.clone()
            >
                // value axis
                <For
                    each=move || ticks.get()
                    key=|t| *t
                    children=move |t| {
                        let y = move || {
                            let top = top();
                            if top == 0 { plot_h } else { plot_h - plot_h * t as f64 / top as f64 }
                        };
                        view! {
                            <line
                                x1=AXIS_GUTTER.to_string()
                                x2=BAR_WIDTH.to_string()
                                y1=move || format!("{:.1}", y())
                                y2=move || format!("{:.1}", y())
                                class="stroke-border"
                                stroke-dasharray="3 3"
                            />
                            <text
                                x=(AXIS_GUTTER - 6.0).to_string()
                                y=move || format!("{:.1}", y())
                                text-anchor="end"
                                dominant-baseline="middle"
                                class="fill-muted-foreground text-[10px]"
                            >
                                {t}
                            </text>
                        }
                    }
                />
                <g transform=format!("translate({AXIS_GUTTER},0)")>
                    {move || {
                        // Bars are scaled to the data max; rescale to the rounded axis top.
                        let max = data.with(|d| d.iter().map(|(_, v)| *v).max().unwrap_or(0));
                        let scale = if top() == 0 { 0.0 } else { max as f64 / top() as f64 };
                        let show = labels_visible();
                        bars.get()
                            .into_iter()
                            .enumerate()
                            .map(|(i, b)| {
                                let h = b.height * scale;
                                let cx = b.x + b.width / 2.0;
                                view! {
                                    <rect
                                        x=format!("{:.1}", b.x)
                                        y=format!("{:.1}", plot_h - h)
                                        width=format!("{:.1}", b.width)
                                        height=format!("{:.1}", h)
                                        rx="3"
                                        fill=palette_color(i)
                                    />
                                    {show.then(|| view! {
                                        <text
                                            x=format!("{cx:.1}")
                                            y=format!("{:.1}", plot_h + 14.0)
                                            text-anchor="middle"
                                            class="fill-muted-foreground text-[10px]"
                                        >
                                            {b.label.clone()}
                                        </text>
                                    })}
                                }
                            })
                            .collect_view()
                    }}
                </g>
            </svg>
        </Show>
    }
}
