//! Embedded single-page chat UI.

pub const CHAT_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>DocuChat</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; }
  #log { border: 1px solid #ccc; border-radius: 6px; padding: 1rem; height: 420px; overflow-y: auto; }
  .turn { margin: 0.5rem 0; white-space: pre-wrap; }
  .user { color: #1a5fb4; }
  .assistant { color: #26a269; }
  .sources { color: #777; font-size: 0.85em; }
  form { display: flex; gap: 0.5rem; margin-top: 1rem; }
  input { flex: 1; padding: 0.5rem; }
</style>
</head>
<body>
<h1>DocuChat</h1>
<div id="log"></div>
<form id="form">
  <input id="input" autocomplete="off" placeholder="Ask about the documents...">
  <button type="submit">Send</button>
</form>
<script>
const log = document.getElementById('log');
const input = document.getElementById('input');

function addTurn(role, text, sources) {
  const div = document.createElement('div');
  div.className = 'turn ' + role;
  div.textContent = (role === 'user' ? 'You: ' : 'Bot: ') + text;
  if (sources && sources.length) {
    const src = document.createElement('div');
    src.className = 'sources';
    src.textContent = 'Sources: ' + sources.join(', ');
    div.appendChild(src);
  }
  log.appendChild(div);
  log.scrollTop = log.scrollHeight;
}

const proto = location.protocol === 'https:' ? 'wss:' : 'ws:';
const ws = new WebSocket(proto + '//' + location.host + '/ws');

ws.onmessage = (event) => {
  const data = JSON.parse(event.data);
  if (data.type === 'history') {
    for (const turn of data.turns) addTurn(turn.role, turn.content);
  } else if (data.type === 'answer') {
    addTurn('assistant', data.message, data.sources);
  } else if (data.type === 'error') {
    addTurn('assistant', '⚠️ ' + data.message);
  }
};

document.getElementById('form').addEventListener('submit', (event) => {
  event.preventDefault();
  const message = input.value.trim();
  if (!message) return;
  addTurn('user', message);
  ws.send(JSON.stringify({ type: 'chat', message }));
  input.value = '';
});
</script>
</body>
</html>
"#;
