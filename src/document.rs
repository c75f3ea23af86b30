//! # Preview Document Assembly
//!
//! Wraps a lowered module body in a complete, self-contained page. The page is
//! the only contract the host surface sees:
//!
//! 1. **Globals first**: the framework runtime and both tracked libraries are
//!    imported and installed on `window` before any user statement runs.
//! 2. **One error sink**: `showError` receives uncaught errors (`window.onerror`),
//!    mount failures (`renderApp`) and anything thrown by the body (`try/catch`).
//! 3. **Non-blocking failure**: the sink reveals a dismissible overlay card that
//!    offers a full reload; the page itself never goes blank.
//! 4. **Single entry**: `window.renderApp(Component)` mounts onto the fixed node.

use crate::options::PreviewOptions;

/// Global function that mounts a component onto the mount node.
pub const RENDER_ENTRY: &str = "renderApp";

/// Function every failure path reports to.
pub const ERROR_SINK: &str = "showError";

const HOOKS: &[&str] = &[
    "useState",
    "useEffect",
    "useRef",
    "useCallback",
    "useMemo",
    "useReducer",
    "useContext",
    "useLayoutEffect",
];

const BASE_STYLES: &str = r#"      ::-webkit-scrollbar { width: 0px; background: transparent; }

      #error-overlay {
        position: fixed;
        bottom: 16px;
        left: 16px;
        right: 16px;
        z-index: 50;
        display: none;
        animation: slideUp 0.3s cubic-bezier(0.16, 1, 0.3, 1);
      }
      @keyframes slideUp {
        from { transform: translateY(100%); opacity: 0; }
        to { transform: translateY(0); opacity: 1; }
      }
      .error-card {
        background: white;
        border-radius: 12px;
        box-shadow: 0 4px 6px -1px rgba(0, 0, 0, 0.1), 0 2px 4px -1px rgba(0, 0, 0, 0.06), 0 0 0 1px rgba(220, 38, 38, 0.2);
        padding: 16px;
        max-width: 400px;
        margin: 0 auto;
        color: #1f2937;
      }
      @media (prefers-color-scheme: dark) {
        .error-card {
          background: #1f2937;
          color: #f3f4f6;
          box-shadow: 0 4px 6px -1px rgba(0, 0, 0, 0.3), 0 0 0 1px rgba(220, 38, 38, 0.5);
        }
      }
"#;

const ERROR_OVERLAY: &str = r#"    <div id="error-overlay">
      <div class="error-card">
        <div style="display: flex; align-items: flex-start; gap: 12px;">
          <div style="color: #ef4444; flex-shrink: 0;">
            <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
              <circle cx="12" cy="12" r="10"/>
              <line x1="12" y1="8" x2="12" y2="12"/>
              <line x1="12" y1="16" x2="12.01" y2="16"/>
            </svg>
          </div>
          <div style="flex: 1;">
            <h3 style="font-weight: 600; margin: 0 0 4px 0; font-size: 14px;">Runtime Error</h3>
            <pre id="error-message" style="font-family: monospace; font-size: 11px; background: rgba(239, 68, 68, 0.1); padding: 8px; border-radius: 6px; color: #ef4444; margin: 0 0 12px 0; overflow-x: auto; white-space: pre-wrap; word-break: break-word;"></pre>
            <button onclick="window.location.reload()" style="background: #ef4444; color: white; border: none; padding: 6px 12px; border-radius: 6px; font-size: 12px; font-weight: 500; cursor: pointer; transition: opacity 0.2s;">
              Reload Preview
            </button>
          </div>
          <button onclick="document.getElementById('error-overlay').style.display='none'" style="color: #9ca3af; background: none; border: none; cursor: pointer; padding: 0;">
            <svg width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
              <line x1="18" y1="6" x2="6" y2="18"/>
              <line x1="6" y1="6" x2="18" y2="18"/>
            </svg>
          </button>
        </div>
      </div>
    </div>
"#;

const ERROR_SINK_SCRIPT: &str = r#"      const showError = (msg) => {
        const overlay = document.getElementById('error-overlay');
        const msgEl = document.getElementById('error-message');
        if (msgEl) msgEl.textContent = msg;
        if (overlay) overlay.style.display = 'block';
      };

      window.onerror = function(message, source, lineno, colno, error) {
        showError(message + "\nLine: " + lineno);
      };
"#;

/// The statement appended after user code: render the entry or raise.
pub fn entry_invocation(options: &PreviewOptions) -> String {
    let entry = options.entry_global();
    format!(
        "if ({entry}) {{ {render}({entry}); }} else {{ throw new Error({message}); }}",
        entry = entry,
        render = RENDER_ENTRY,
        message = js_string(&options.missing_entry_message()),
    )
}

/// Assemble the full preview page around an already-lowered body.
pub fn render_document(body: &str, options: &PreviewOptions) -> String {
    let styling = &options.styling;
    let mut html = String::with_capacity(body.len() + 8 * 1024);

    html.push_str("<!DOCTYPE html>\n<html>\n  <head>\n");
    html.push_str("    <meta charset=\"UTF-8\" />\n");
    html.push_str("    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no\" />\n");
    html.push_str(&format!(
        "    <script src=\"{}\"></script>\n",
        escape_html(&styling.utility_css_url)
    ));
    html.push_str(&format!(
        "    <link href=\"{}\" rel=\"stylesheet\">\n",
        escape_html(&styling.font_url)
    ));
    html.push_str("    <script>\n");
    html.push_str(&format!(
        "      tailwind.config = {{ theme: {{ extend: {{ fontFamily: {{ sans: [{}, 'sans-serif'] }}, colors: {{ primary: {} }} }} }} }}\n",
        js_string(&styling.font_family),
        js_string(&styling.primary_color),
    ));
    html.push_str("    </script>\n    <style>\n");
    html.push_str(&format!(
        "      body {{ background-color: white; margin: 0; padding: 0; font-family: {}, sans-serif; min-height: 100vh; overflow-x: hidden; -webkit-font-smoothing: antialiased; }}\n",
        js_string(&styling.font_family)
    ));
    html.push_str(BASE_STYLES);
    html.push_str("    </style>\n  </head>\n  <body>\n");
    html.push_str(&format!(
        "    <div id=\"{}\"></div>\n",
        escape_html(&options.mount_node_id)
    ));
    html.push_str(ERROR_OVERLAY);
    html.push_str("    <script type=\"module\">\n");
    html.push_str(&module_script(body, options));
    html.push_str("    </script>\n  </body>\n</html>\n");
    html
}

fn module_script(body: &str, options: &PreviewOptions) -> String {
    let icons = &options.icon_library;
    let charts = &options.chart_library;
    let mut script = String::new();

    script.push_str(&format!(
        "      import React from {};\n",
        js_string(&options.runtime.react_url)
    ));
    script.push_str(&format!(
        "      import ReactDOM from {};\n",
        js_string(&options.runtime.react_dom_url)
    ));
    script.push_str(&format!(
        "      import * as {} from {};\n",
        icons.global,
        js_string(&icons.url)
    ));
    script.push_str(&format!(
        "      import * as {} from {};\n\n",
        charts.global,
        js_string(&charts.url)
    ));

    script.push_str("      window.React = React;\n");
    script.push_str(&format!("      window.{0} = {0};\n", icons.global));
    script.push_str(&format!("      window.{0} = {0};\n\n", charts.global));

    script.push_str(&format!("      const {{ {} }} = React;\n\n", HOOKS.join(", ")));

    script.push_str(ERROR_SINK_SCRIPT);
    script.push('\n');

    script.push_str(&format!("      window.{} = (Component) => {{\n", RENDER_ENTRY));
    script.push_str("        try {\n");
    script.push_str("          if (!Component) throw new Error(\"Component is undefined.\");\n");
    script.push_str(&format!(
        "          const root = ReactDOM.createRoot(document.getElementById({}));\n",
        js_string(&options.mount_node_id)
    ));
    script.push_str("          root.render(React.createElement(Component));\n");
    script.push_str(&format!("        }} catch (e) {{ {}(e.message); }}\n", ERROR_SINK));
    script.push_str("      };\n\n");

    script.push_str("      try {\n");
    script.push_str(&escape_script_body(body));
    if !body.ends_with('\n') {
        script.push('\n');
    }
    script.push_str("      } catch (err) {\n");
    script.push_str(&format!("        {}(err.message);\n", ERROR_SINK));
    script.push_str("      }\n");
    script
}

/// Minimal page shown when the source could not be built at all.
pub fn render_error_document(message: &str) -> String {
    format!(
        "<html><body><div style=\"color:red; padding:20px;\">Build Error: {}</div></body></html>",
        escape_html(message)
    )
}

/// Keep user text from closing the surrounding `<script>` element.
fn escape_script_body(body: &str) -> String {
    body.replace("</script", "<\\/script")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Quote a value as a JS string literal. JSON strings are valid JS strings.
fn js_string(value: &str) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_invocation_names_missing_symbol() {
        let stmt = entry_invocation(&PreviewOptions::default());
        assert_eq!(
            stmt,
            "if (window.App) { renderApp(window.App); } else { throw new Error(\"No default export found (window.App is undefined)\"); }"
        );
    }

    #[test]
    fn test_globals_installed_before_body() {
        let html = render_document("console.log('user');\n", &PreviewOptions::default());
        let lucide = html.find("window.Lucide = Lucide;").unwrap();
        let recharts = html.find("window.Recharts = Recharts;").unwrap();
        let react = html.find("window.React = React;").unwrap();
        let render = html.find("window.renderApp = (Component) => {").unwrap();
        let body = html.find("console.log('user');").unwrap();
        assert!(react < body && lucide < body && recharts < body && render < body);
        assert!(html.contains("<div id=\"root\"></div>"));
        assert!(html.contains("window.onerror = function"));
        assert!(html.contains("Reload Preview"));
    }

    #[test]
    fn test_body_cannot_close_script() {
        let html = render_document("const s = \"</script><b>\";", &PreviewOptions::default());
        assert!(html.contains("const s = \"<\\/script><b>\";"));
        assert_eq!(html.matches("</script>").count(), 3);
    }

    #[test]
    fn test_error_document_escapes_message() {
        let html = render_error_document("Unexpected token `<div>`");
        assert_eq!(
            html,
            "<html><body><div style=\"color:red; padding:20px;\">Build Error: Unexpected token `&lt;div&gt;`</div></body></html>"
        );
    }
}
