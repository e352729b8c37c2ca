//! Frame rendering for the mocktty TUI.
//!
//! Layout: a one-line header, the services sidebar, and a content column
//! holding the server line, the function tabs, the parameter form, and the
//! result pane (raw text or table). All state lives in [`App`]; rendering is
//! side-effect free except for cursor placement and table scroll clamping.

use ratatui::{prelude::*, widgets::*};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Focus};
use crate::tables;
use crate::theme;
use mocktty_types::{IconKind, ParamKind};

const THROBBER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(1),    // body
            Constraint::Length(1), // hints
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(1)])
        .split(chunks[1]);

    draw_services(f, app, body[0]);

    let form_height = (app.fields.len().max(1) + 3) as u16;
    let content = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),           // server line
            Constraint::Length(3),           // function tabs
            Constraint::Length(form_height), // parameter form
            Constraint::Min(3),              // result pane
        ])
        .split(body[1]);

    draw_server_line(f, app, content[0]);
    draw_function_tabs(f, app, content[1]);
    draw_param_form(f, app, content[2]);
    draw_result(f, app, content[3]);

    draw_hints(f, chunks[2]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" Mocktty ", theme::title_style().fg(theme::ACCENT)),
        Span::styled("业务功能测试控制台", theme::text_muted()),
    ];
    if app.executing {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} 正在请求...", THROBBER[app.throbber_idx % THROBBER.len()]),
            theme::text_muted(),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn icon_glyph(icon: IconKind) -> &'static str {
    match icon {
        IconKind::Activity => "●",
        IconKind::Users => "◆",
        IconKind::ShoppingCart => "▣",
        IconKind::Database => "▤",
        IconKind::BarChart => "▥",
    }
}

fn draw_services(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .ctx
        .registry
        .services()
        .iter()
        .map(|service| ListItem::new(format!("{} {}", icon_glyph(service.icon), service.name)))
        .collect();

    let focused = app.focus == Focus::Services;
    let list = List::new(items)
        .block(
            Block::default()
                .title(Span::styled("业务服务", theme::title_style()))
                .borders(Borders::ALL)
                .border_style(theme::border_style(focused)),
        )
        .style(theme::text_style())
        .highlight_style(theme::list_highlight_style());
    f.render_stateful_widget(list, area, &mut app.service_list);
}

fn draw_server_line(f: &mut Frame, app: &App, area: Rect) {
    let servers = app.servers_for_current_service();
    let line = match app.current_server() {
        Some(server) => {
            let position = servers
                .iter()
                .position(|record| record.id == server.id)
                .map_or(0, |idx| idx + 1);
            Line::from(vec![
                Span::styled(server.name.clone(), theme::text_style()),
                Span::raw("  "),
                Span::styled(server.address.clone(), theme::text_muted()),
                Span::styled(format!("  ({position}/{})", servers.len()), theme::text_muted()),
            ])
        }
        None => Line::from(Span::styled("暂无服务器，请添加", theme::warn_style())),
    };

    let block = Block::default()
        .title(Span::styled("服务器", theme::title_style()))
        .borders(Borders::ALL)
        .border_style(theme::border_style(false));
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_function_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = app
        .current_service()
        .functions
        .iter()
        .map(|function| {
            if function.auto_execute {
                Line::from(format!("{} ⚡", function.name))
            } else {
                Line::from(function.name.clone())
            }
        })
        .collect();

    let focused = app.focus == Focus::Functions;
    let tabs = Tabs::new(titles)
        .select(app.function_idx)
        .style(theme::text_muted())
        .highlight_style(theme::list_highlight_style())
        .block(
            Block::default()
                .title(Span::styled("功能", theme::title_style()))
                .borders(Borders::ALL)
                .border_style(theme::border_style(focused)),
        );
    f.render_widget(tabs, area);
}

fn draw_param_form(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Params;
    let block = Block::default()
        .title(Span::styled("参数", theme::title_style()))
        .borders(Borders::ALL)
        .border_style(theme::border_style(focused));
    let inner = block.inner(area);

    let mut lines: Vec<Line> = Vec::new();
    for (idx, field) in app.fields.iter().enumerate() {
        let selected = focused && idx == app.field_idx;
        let name_style = if selected {
            theme::title_style().fg(theme::ACCENT)
        } else {
            theme::text_muted()
        };
        let mut spans = vec![Span::styled(format!("{}: ", field.name), name_style)];
        spans.push(Span::styled(field_display(field), theme::text_style()));
        if field.has_default {
            spans.push(Span::styled(" (默认值)", theme::text_muted()));
        }
        lines.push(Line::from(spans));
    }
    if app.fields.is_empty() {
        lines.push(Line::from(Span::styled("此功能无参数", theme::text_muted())));
    }

    if app.current_function().auto_execute {
        lines.push(Line::from(Span::styled(
            "⚡ 此功能已启用自动执行，参数变更时将自动测试",
            theme::text_muted(),
        )));
    } else {
        lines.push(Line::from(Span::styled("Enter 执行测试", theme::text_muted())));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);

    // Place the terminal cursor at the end of the edited text field.
    if focused
        && let Some(field) = app.fields.get(app.field_idx)
        && field.kind != ParamKind::Select
    {
        let prefix = format!("{}: ", field.name);
        let x = inner.x + (prefix.width() + field_display(field).width()) as u16;
        let y = inner.y + app.field_idx as u16;
        if x < inner.right() && y < inner.bottom() {
            f.set_cursor_position((x, y));
        }
    }
}

fn field_display(field: &crate::app::Field) -> String {
    match field.kind {
        ParamKind::Password => "•".repeat(field.value.chars().count()),
        ParamKind::Select => format!("◂ {} ▸", field.value),
        _ => field.value.clone(),
    }
}

fn draw_result(f: &mut Frame, app: &mut App, area: Rect) {
    if app.table_view_active() {
        tables::draw_result_table(f, area, app);
        return;
    }

    let focused = app.focus == Focus::Result;
    let mut title_spans = vec![Span::styled("测试结果", theme::title_style())];
    if app.result.whole_result_copied() {
        title_spans.push(Span::styled("  已复制!", theme::copied_style()));
    }

    let text = if app.result.is_empty() {
        Text::styled("暂无结果", theme::text_muted())
    } else {
        Text::styled(app.result.raw.clone(), theme::text_style())
    };

    let paragraph = Paragraph::new(text)
        .scroll((app.result.scroll as u16, 0))
        .block(
            Block::default()
                .title(Line::from(title_spans))
                .borders(Borders::ALL)
                .border_style(theme::border_style(focused)),
        );
    f.render_widget(paragraph, area);
}

fn draw_hints(f: &mut Frame, area: Rect) {
    let hints = Paragraph::new(Line::from(vec![
        Span::styled("Tab", theme::title_style().fg(theme::ACCENT)),
        Span::styled(" 焦点  ", theme::text_muted()),
        Span::styled("↑/↓/◂/▸", theme::title_style().fg(theme::ACCENT)),
        Span::styled(" 选择  ", theme::text_muted()),
        Span::styled("Enter", theme::title_style().fg(theme::ACCENT)),
        Span::styled(" 执行  ", theme::text_muted()),
        Span::styled("s", theme::title_style().fg(theme::ACCENT)),
        Span::styled(" 服务器  ", theme::text_muted()),
        Span::styled("d", theme::title_style().fg(theme::ACCENT)),
        Span::styled(" 删除服务器  ", theme::text_muted()),
        Span::styled("c", theme::title_style().fg(theme::ACCENT)),
        Span::styled(" 复制单元格  ", theme::text_muted()),
        Span::styled("y", theme::title_style().fg(theme::ACCENT)),
        Span::styled(" 复制结果  ", theme::text_muted()),
        Span::styled("q", theme::title_style().fg(theme::ACCENT)),
        Span::styled(" 退出", theme::text_muted()),
    ]))
    .style(theme::text_muted());
    f.render_widget(hints, area);
}
