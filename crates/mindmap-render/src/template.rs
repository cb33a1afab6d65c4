//! Embedded document template: stylesheet, toggle script, and shell
//!
//! Rendered output is self-contained: everything inlined, no external
//! assets. The class names here are the same ones the legacy parser keys
//! on, which is what makes render -> parse round-trips possible.

/// Inline stylesheet with the four category themes plus the fallback
pub(crate) const STYLE: &str = r#"
body {
    margin: 0;
    padding: 20px;
    font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    min-height: 100vh;
    overflow-x: auto;
}

.mindmap-container {
    background: rgba(255, 255, 255, 0.95);
    border-radius: 15px;
    padding: 30px;
    box-shadow: 0 20px 40px rgba(0, 0, 0, 0.1);
    min-width: 1200px;
}

.mindmap-title {
    text-align: center;
    font-size: 2.5em;
    font-weight: bold;
    color: #2c3e50;
    margin-bottom: 30px;
    text-shadow: 2px 2px 4px rgba(0, 0, 0, 0.1);
}

.search-info {
    text-align: center;
    font-size: 1.2em;
    color: #34495e;
    margin-bottom: 20px;
    background: rgba(52, 152, 219, 0.1);
    padding: 15px;
    border-radius: 10px;
}

.mindmap {
    display: flex;
    flex-direction: column;
    align-items: center;
    gap: 30px;
}

.root-node {
    background: linear-gradient(135deg, #FF6B6B, #FF8E53);
    color: white;
    padding: 20px 40px;
    border-radius: 25px;
    font-size: 1.8em;
    font-weight: bold;
    box-shadow: 0 10px 25px rgba(255, 107, 107, 0.3);
    cursor: pointer;
    transition: all 0.3s ease;
}

.root-node:hover {
    transform: translateY(-5px);
    box-shadow: 0 15px 35px rgba(255, 107, 107, 0.4);
}

.main-branches {
    display: flex;
    justify-content: space-around;
    width: 100%;
    gap: 30px;
    flex-wrap: wrap;
}

.branch {
    flex: 1;
    min-width: 350px;
    max-width: 400px;
}

.level-node {
    padding: 15px 25px;
    border-radius: 20px;
    font-weight: bold;
    cursor: pointer;
    transition: all 0.3s ease;
    margin-bottom: 15px;
    text-align: center;
    box-shadow: 0 5px 15px rgba(0, 0, 0, 0.1);
    background: linear-gradient(135deg, #95a5a6, #7f8c8d);
    color: white;
}

.beginner {
    background: linear-gradient(135deg, #4ECDC4, #44A08D);
    color: white;
}

.intermediate {
    background: linear-gradient(135deg, #FDBB2D, #22C1C3);
    color: white;
}

.advanced {
    background: linear-gradient(135deg, #FA8072, #FF6347);
    color: white;
}

.community {
    background: linear-gradient(135deg, #667eea, #764ba2);
    color: white;
}

.level-node:hover {
    transform: translateY(-3px);
    box-shadow: 0 8px 25px rgba(0, 0, 0, 0.2);
}

.sub-branches {
    margin-left: 20px;
    margin-top: 15px;
    display: none;
}

.sub-branches.expanded {
    display: block;
    animation: slideDown 0.3s ease-out;
}

@keyframes slideDown {
    from { opacity: 0; max-height: 0; }
    to { opacity: 1; max-height: 1000px; }
}

.sub-node {
    background: rgba(255, 255, 255, 0.9);
    border-left: 4px solid #3498db;
    padding: 12px 20px;
    margin: 8px 0;
    border-radius: 8px;
    font-size: 0.95em;
    box-shadow: 0 2px 10px rgba(0, 0, 0, 0.05);
    cursor: pointer;
    transition: all 0.2s ease;
}

.sub-node:hover {
    background: rgba(52, 152, 219, 0.1);
    transform: translateX(5px);
}

.detail-node {
    background: rgba(255, 255, 255, 0.7);
    border-left: 3px solid #95a5a6;
    padding: 8px 15px;
    margin: 5px 0 5px 20px;
    border-radius: 5px;
    font-size: 0.85em;
    color: #2c3e50;
}

.resource-node {
    background: rgba(46, 204, 113, 0.1);
    border-left: 3px solid #2ecc71;
    padding: 8px 15px;
    margin: 5px 0 5px 20px;
    border-radius: 5px;
    font-size: 0.85em;
    color: #27ae60;
}

.resource-node a {
    color: #2980b9;
    text-decoration: underline;
    font-weight: 500;
    padding: 2px 4px;
    border-radius: 3px;
    background: rgba(41, 128, 185, 0.1);
}

.resource-node a:hover {
    color: #ffffff;
    background: #3498db;
    text-decoration: none;
}

.book-node {
    background: rgba(155, 89, 182, 0.1);
    border-left: 3px solid #9b59b6;
    padding: 8px 15px;
    margin: 5px 0 5px 20px;
    border-radius: 5px;
    font-size: 0.85em;
    color: #8e44ad;
}

.similarity-score {
    background: rgba(231, 76, 60, 0.1);
    border-left: 3px solid #e74c3c;
    padding: 8px 15px;
    margin: 5px 0 5px 20px;
    border-radius: 5px;
    font-size: 0.85em;
    color: #c0392b;
    font-weight: bold;
}

.expand-icon {
    float: right;
    transition: transform 0.3s ease;
}

.expand-icon.rotated {
    transform: rotate(90deg);
}

.controls {
    text-align: center;
    margin-bottom: 20px;
}

.btn {
    background: linear-gradient(135deg, #667eea, #764ba2);
    color: white;
    border: none;
    padding: 10px 20px;
    border-radius: 25px;
    cursor: pointer;
    margin: 0 10px;
    font-size: 0.9em;
    transition: all 0.3s ease;
}

.btn:hover {
    transform: translateY(-2px);
    box-shadow: 0 5px 15px rgba(102, 126, 234, 0.4);
}
"#;

/// Client-side toggle behavior; presentational only
pub(crate) const SCRIPT: &str = r#"
let mainBranchesVisible = false;

function toggleAllBranches() {
    const mainBranches = document.getElementById('mainBranches');
    mainBranchesVisible = !mainBranchesVisible;
    mainBranches.style.display = mainBranchesVisible ? 'flex' : 'none';
}

function toggleNode(nodeId, icon) {
    const node = document.getElementById(nodeId);
    if (node.style.display === 'none' || node.style.display === '') {
        node.style.display = 'block';
        node.classList.add('expanded');
        if (icon) { icon.classList.add('rotated'); icon.innerHTML = '▼'; }
    } else {
        node.style.display = 'none';
        node.classList.remove('expanded');
        if (icon) { icon.classList.remove('rotated'); icon.innerHTML = '▶'; }
    }
}

function toggleBranch(branchId) {
    toggleNode(branchId, event.currentTarget.querySelector('.expand-icon'));
}

function toggleSubBranch(subBranchId) {
    toggleNode(subBranchId, event.currentTarget.querySelector('.expand-icon'));
}

function expandAll() {
    const mainBranches = document.getElementById('mainBranches');
    mainBranches.style.display = 'flex';
    mainBranchesVisible = true;

    document.querySelectorAll('.sub-branches').forEach(branch => {
        branch.style.display = 'block';
        branch.classList.add('expanded');
    });
    document.querySelectorAll('.expand-icon').forEach(icon => {
        icon.classList.add('rotated');
        icon.innerHTML = '▼';
    });
}

function collapseAll() {
    const mainBranches = document.getElementById('mainBranches');
    mainBranches.style.display = 'none';
    mainBranchesVisible = false;

    document.querySelectorAll('.sub-branches').forEach(branch => {
        branch.style.display = 'none';
        branch.classList.remove('expanded');
    });
    document.querySelectorAll('.expand-icon').forEach(icon => {
        icon.classList.remove('rotated');
        icon.innerHTML = '▶';
    });
}
"#;

/// Escape text for interpolation into element content
pub(crate) fn esc(text: &str) -> String {
    htmlescape::encode_minimal(text)
}

/// Escape text for interpolation into attribute values
pub(crate) fn esc_attr(text: &str) -> String {
    htmlescape::encode_attribute(text)
}

/// Wrap a rendered body in the complete self-contained document
pub(crate) fn document_shell(title: &str, body: &str) -> String {
    let mut out = String::with_capacity(STYLE.len() + SCRIPT.len() + body.len() + 512);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"UTF-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    out.push_str("<title>");
    out.push_str(&esc(title));
    out.push_str("</title>\n<style>");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n<div class=\"mindmap-container\">\n");
    out.push_str(body);
    out.push_str("\n</div>\n<script>");
    out.push_str(SCRIPT);
    out.push_str("</script>\n</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_escapes_title_and_inlines_assets() {
        let html = document_shell("<b>x</b>", "<p>body</p>");
        assert!(html.contains("<title>&lt;b&gt;x&lt;/b&gt;</title>"));
        assert!(html.contains(".level-node"));
        assert!(html.contains("function toggleBranch"));
        assert!(html.contains("<p>body</p>"));
    }

    #[test]
    fn attribute_escaping_covers_quotes() {
        let escaped = esc_attr(r#"" onmouseover="evil()"#);
        assert!(!escaped.contains('"'));
    }
}
