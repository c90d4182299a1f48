use axum::{response::Html, routing::get, Router};

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Statistical Analyst AI</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 2rem auto; max-width: 52rem; color: #1d1d1f; }
    h1 { margin-bottom: 0.5rem; }
    .card { border: 1px solid #ddd; padding: 1rem; border-radius: 8px; margin-bottom: 1rem; }
    label { display: block; margin-top: 0.75rem; font-weight: 600; }
    input[type=text], textarea { width: 100%; padding: 0.5rem; box-sizing: border-box; }
    button { margin-top: 1rem; padding: 0.6rem 1rem; }
    pre { background: #f6f8fa; padding: 1rem; overflow: auto; max-height: 16rem; white-space: pre-wrap; }
    .turn { padding: 0.5rem 0.75rem; border-radius: 6px; margin: 0.5rem 0; white-space: pre-wrap; }
    .user { background: #eef4ff; }
    .assistant { background: #f3f3f3; }
    .notice.info { color: #8a6d00; }
    .notice.error { color: #b00020; }
  </style>
</head>
<body>
  <h1>Statistical Analyst AI</h1>
  <p>Upload a document and ask about it, or ask any statistics question.</p>

  <div class="card">
    <h2>Upload a file</h2>
    <input id="fileInput" type="file"
      accept=".pdf,.txt,.csv,.doc,.docx,.json,.jpg,.jpeg,.png,.pptx,.xlsx" />
    <button id="uploadBtn">Upload</button>
    <div id="notices"></div>
    <label>File Preview</label>
    <pre id="preview"></pre>
    <label>Ask a question about the file</label>
    <input id="fileQuery" type="text" />
    <button id="fileQueryBtn">Ask</button>
  </div>

  <div class="card">
    <h2>Conversation</h2>
    <div id="transcript"></div>
    <label>Ask a statistics question</label>
    <textarea id="chatInput" rows="3"></textarea>
    <button id="chatBtn">Send</button>
  </div>

  <script>
    let sessionId = null;
    const el = (id) => document.getElementById(id);

    async function api(path, options) {
      const res = await fetch(path, options);
      if (res.status === 204) return null;
      const body = await res.json();
      if (!res.ok) throw new Error(body.error ? body.error.message : res.statusText);
      return body;
    }

    function showNotices(notices) {
      el('notices').innerHTML = '';
      for (const n of notices) {
        const div = document.createElement('div');
        div.className = 'notice ' + n.level;
        div.textContent = n.message;
        el('notices').appendChild(div);
      }
    }

    function render(messages) {
      const box = el('transcript');
      box.innerHTML = '';
      for (const m of messages) {
        const div = document.createElement('div');
        div.className = 'turn ' + m.role;
        div.textContent = m.content;
        box.appendChild(div);
      }
    }

    async function refresh() {
      const body = await api(`/api/sessions/${sessionId}/messages`);
      render(body.messages);
    }

    async function start() {
      const body = await api('/api/sessions', { method: 'POST' });
      sessionId = body.session_id;
      await refresh();
    }

    el('uploadBtn').onclick = async () => {
      const file = el('fileInput').files[0];
      if (!file) return;
      const form = new FormData();
      form.append('file', file);
      try {
        const body = await api(`/api/sessions/${sessionId}/files`, { method: 'POST', body: form });
        el('preview').textContent = body.preview;
        showNotices(body.notices);
      } catch (e) {
        showNotices([{ level: 'error', message: e.message }]);
      }
    };

    async function send(path, payload) {
      try {
        const body = await api(path, {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify(payload),
        });
        render(body.messages);
      } catch (e) {
        showNotices([{ level: 'error', message: e.message }]);
        await refresh();
      }
    }

    el('fileQueryBtn').onclick = async () => {
      const query = el('fileQuery').value.trim();
      if (!query) return;
      await send(`/api/sessions/${sessionId}/files/query`, { query });
    };

    el('chatBtn').onclick = async () => {
      const message = el('chatInput').value.trim();
      if (!message) return;
      el('chatInput').value = '';
      await send(`/api/sessions/${sessionId}/chat`, { message });
    };

    start();
  </script>
</body>
</html>
"#;
